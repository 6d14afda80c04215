mod flight_unit;
mod pid_unit;
