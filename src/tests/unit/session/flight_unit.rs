use crate::session::flight::{FlightState, FlightTable};
use crate::session::pid::PacketIdentifier;

fn id(value: u16) -> PacketIdentifier {
    PacketIdentifier::from_u16(value).unwrap()
}

#[test]
fn tracks_one_record_per_identifier() {
    let mut flights = FlightTable::new();
    assert!(flights.await_puback(id(1), vec![0x30]));
    assert!(flights.is_used(id(1)));
    // A second record under the same identifier is refused.
    assert!(!flights.await_pubrec(id(1), vec![0x30]));
    assert_eq!(flights.len(), 1);
}

#[test]
fn remove_returns_the_record() {
    let mut flights = FlightTable::new();
    flights.await_pubrel(id(7), String::from("/ping"), b"x".to_vec());
    match flights.remove(id(7)) {
        Some(FlightState::AwaitingPubrel { topic, payload }) => {
            assert_eq!(topic, "/ping");
            assert_eq!(payload, b"x");
        }
        _ => panic!("expected the held publish"),
    }
    assert!(!flights.is_used(id(7)));
    assert!(flights.remove(id(7)).is_none());
}

#[test]
fn identifier_is_reusable_after_removal() {
    let mut flights = FlightTable::new();
    flights.await_puback(id(5), vec![]);
    flights.remove(id(5));
    assert!(flights.await_pubcomp(id(5)));
}

#[test]
fn iteration_preserves_insertion_order() {
    let mut flights = FlightTable::new();
    flights.await_puback(id(3), vec![]);
    flights.await_pubcomp(id(1));
    flights.await_pubrec(id(2), vec![]);

    let order: Vec<u16> = flights.iter().map(|(id, _)| id.get()).collect();
    assert_eq!(order, [3, 1, 2]);
}

#[test]
fn clear_empties_the_table() {
    let mut flights = FlightTable::new();
    flights.await_puback(id(1), vec![]);
    flights.await_pubcomp(id(2));
    flights.clear();
    assert_eq!(flights.len(), 0);
    assert!(!flights.is_used(id(1)));
}
