use crate::session::pid::{PacketIdAllocator, PacketIdentifier};

#[test]
fn zero_is_not_a_packet_identifier() {
    assert!(PacketIdentifier::from_u16(0).is_none());
    assert_eq!(PacketIdentifier::from_u16(1).unwrap().get(), 1);
}

#[test]
fn allocates_the_full_range_then_wraps_to_one() {
    let mut allocator = PacketIdAllocator::new();
    for expected in 1..=u16::MAX {
        let id = allocator.allocate(|_| false).unwrap();
        assert_eq!(id.get(), expected);
    }
    assert_eq!(allocator.allocate(|_| false).unwrap().get(), 1);
}

#[test]
fn skips_identifiers_still_in_flight() {
    let mut allocator = PacketIdAllocator::new();
    let busy = [2u16, 3];
    assert_eq!(allocator.allocate(|id| busy.contains(&id.get())).unwrap().get(), 1);
    assert_eq!(allocator.allocate(|id| busy.contains(&id.get())).unwrap().get(), 4);
}

#[test]
fn returns_none_when_everything_is_in_flight() {
    let mut allocator = PacketIdAllocator::new();
    assert!(allocator.allocate(|_| true).is_none());
}

#[test]
fn reset_restarts_the_sequence() {
    let mut allocator = PacketIdAllocator::new();
    allocator.allocate(|_| false).unwrap();
    allocator.allocate(|_| false).unwrap();
    allocator.reset();
    assert_eq!(allocator.allocate(|_| false).unwrap().get(), 1);
}
