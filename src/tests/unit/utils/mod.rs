mod buffer_writer_unit;
