//! ATmega328P boards: Arduino Uno, Nano, Duemilanove, Mini, Ethernet, Fio,
//! BT, LilyPad, Pro and NG

use crate::gpio::{Digital, PinBinding, PinId, PortId, PortRegisters};

/// Writing 1 to a `PINx` bit toggles the matching `PORTx` bit
pub const PIN_WRITE_TOGGLES: bool = true;

ports! {
    B: (0x23, 0x24, 0x25),
    C: (0x26, 0x27, 0x28),
    D: (0x29, 0x2A, 0x2B),
}

pins! {
    0 => D 0,
    1 => D 1,
    2 => D 2,
    3 => D 3,
    4 => D 4,
    5 => D 5,
    6 => D 6,
    7 => D 7,
    8 => B 0,
    9 => B 1,
    10 => B 2,
    11 => B 3,
    12 => B 4,
    13 => B 5,
    14 => C 0,
    15 => C 1,
    16 => C 2,
    17 => C 3,
    18 => C 4,
    19 => C 5,
}

pub const SS: u8 = 10;
pub const MOSI: u8 = 11;
pub const MISO: u8 = 12;
pub const SCK: u8 = 13;

pub const SDA: u8 = 18;
pub const SCL: u8 = 19;
pub const LED_BUILTIN: u8 = 13;

pub const A0: u8 = 14;
pub const A1: u8 = 15;
pub const A2: u8 = 16;
pub const A3: u8 = 17;
pub const A4: u8 = 18;
pub const A5: u8 = 19;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_is_port_b_bit_5() {
        assert_eq!(lookup(LED_BUILTIN), Some(PinBinding::new(PortB::REGS, 5)));
        assert_eq!(PortB::REGS.port.addr(), 0x25);
    }

    #[test]
    fn analog_header_is_port_c() {
        for (i, num) in [A0, A1, A2, A3, A4, A5].into_iter().enumerate() {
            assert_eq!(lookup(num), Some(PinBinding::new(PortC::REGS, i as u8)));
        }
    }
}
