//! ATmega644P / ATmega1284P: Sanguino

use crate::gpio::{Digital, PinBinding, PinId, PortId, PortRegisters};

/// Writing 1 to a `PINx` bit toggles the matching `PORTx` bit
pub const PIN_WRITE_TOGGLES: bool = true;

ports! {
    A: (0x20, 0x21, 0x22),
    B: (0x23, 0x24, 0x25),
    C: (0x26, 0x27, 0x28),
    D: (0x29, 0x2A, 0x2B),
}

pins! {
    0 => B 0,
    1 => B 1,
    2 => B 2,
    3 => B 3,
    4 => B 4,
    5 => B 5,
    6 => B 6,
    7 => B 7,
    8 => D 0,
    9 => D 1,
    10 => D 2,
    11 => D 3,
    12 => D 4,
    13 => D 5,
    14 => D 6,
    15 => D 7,
    16 => C 0,
    17 => C 1,
    18 => C 2,
    19 => C 3,
    20 => C 4,
    21 => C 5,
    22 => C 6,
    23 => C 7,
    24 => A 0,
    25 => A 1,
    26 => A 2,
    27 => A 3,
    28 => A 4,
    29 => A 5,
    30 => A 6,
    31 => A 7,
}

pub const SS: u8 = 4;
pub const MOSI: u8 = 5;
pub const MISO: u8 = 6;
pub const SCK: u8 = 7;

pub const SDA: u8 = 17;
pub const SCL: u8 = 16;
pub const LED_BUILTIN: u8 = 0;

// The analog header runs backwards over port A
pub const A0: u8 = 31;
pub const A1: u8 = 30;
pub const A2: u8 = 29;
pub const A3: u8 = 28;
pub const A4: u8 = 27;
pub const A5: u8 = 26;
pub const A6: u8 = 25;
pub const A7: u8 = 24;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analog_header_is_port_a_reversed() {
        for (i, num) in [A0, A1, A2, A3, A4, A5, A6, A7].into_iter().enumerate() {
            assert_eq!(lookup(num), Some(PinBinding::new(PortA::REGS, 7 - i as u8)));
        }
    }

    #[test]
    fn spi_is_upper_port_b() {
        assert_eq!(lookup(SS), Some(PinBinding::new(PortB::REGS, 4)));
        assert_eq!(lookup(SCK), Some(PinBinding::new(PortB::REGS, 7)));
    }
}
