//! ATmega2560: Arduino Mega 2560
//!
//! Ports H, J, K and L sit in the extended I/O space above `0x5F`, out of
//! reach of `sbi`/`cbi`. Single-bit writes to pins on those ports run inside
//! a critical section.

use crate::gpio::{Digital, PinBinding, PinId, PortId, PortRegisters};

/// Writing 1 to a `PINx` bit toggles the matching `PORTx` bit
pub const PIN_WRITE_TOGGLES: bool = true;

ports! {
    A: (0x20, 0x21, 0x22),
    B: (0x23, 0x24, 0x25),
    C: (0x26, 0x27, 0x28),
    D: (0x29, 0x2A, 0x2B),
    E: (0x2C, 0x2D, 0x2E),
    F: (0x2F, 0x30, 0x31),
    G: (0x32, 0x33, 0x34),
    H: (0x100, 0x101, 0x102),
    J: (0x103, 0x104, 0x105),
    K: (0x106, 0x107, 0x108),
    L: (0x109, 0x10A, 0x10B),
}

pins! {
    0 => E 0,
    1 => E 1,
    2 => E 4,
    3 => E 5,
    4 => G 5,
    5 => E 3,
    6 => H 3,
    7 => H 4,
    8 => H 5,
    9 => H 6,
    10 => B 4,
    11 => B 5,
    12 => B 6,
    13 => B 7,
    14 => J 1,
    15 => J 0,
    16 => H 1,
    17 => H 0,
    18 => D 3,
    19 => D 2,
    20 => D 1,
    21 => D 0,
    22 => A 0,
    23 => A 1,
    24 => A 2,
    25 => A 3,
    26 => A 4,
    27 => A 5,
    28 => A 6,
    29 => A 7,
    30 => C 7,
    31 => C 6,
    32 => C 5,
    33 => C 4,
    34 => C 3,
    35 => C 2,
    36 => C 1,
    37 => C 0,
    38 => D 7,
    39 => G 2,
    40 => G 1,
    41 => G 0,
    42 => L 7,
    43 => L 6,
    44 => L 5,
    45 => L 4,
    46 => L 3,
    47 => L 2,
    48 => L 1,
    49 => L 0,
    50 => B 3,
    51 => B 2,
    52 => B 1,
    53 => B 0,
    54 => F 0,
    55 => F 1,
    56 => F 2,
    57 => F 3,
    58 => F 4,
    59 => F 5,
    60 => F 6,
    61 => F 7,
    62 => K 0,
    63 => K 1,
    64 => K 2,
    65 => K 3,
    66 => K 4,
    67 => K 5,
    68 => K 6,
    69 => K 7,
}

pub const SS: u8 = 53;
pub const MOSI: u8 = 51;
pub const MISO: u8 = 50;
pub const SCK: u8 = 52;

pub const SDA: u8 = 20;
pub const SCL: u8 = 21;
pub const LED_BUILTIN: u8 = 13;

pub const A0: u8 = 54;
pub const A1: u8 = 55;
pub const A2: u8 = 56;
pub const A3: u8 = 57;
pub const A4: u8 = 58;
pub const A5: u8 = 59;
pub const A6: u8 = 60;
pub const A7: u8 = 61;
pub const A8: u8 = 62;
pub const A9: u8 = 63;
pub const A10: u8 = 64;
pub const A11: u8 = 65;
pub const A12: u8 = 66;
pub const A13: u8 = 67;
pub const A14: u8 = 68;
pub const A15: u8 = 69;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::OutputPin;
    use crate::sim;

    #[test]
    fn led_is_port_b_bit_7() {
        assert_eq!(lookup(LED_BUILTIN), Some(PinBinding::new(PortB::REGS, 7)));
    }

    #[test]
    fn extended_ports_need_protection() {
        for regs in [PortH::REGS, PortJ::REGS, PortK::REGS, PortL::REGS] {
            assert!(!regs.port.is_bit_addressable());
        }
        for regs in [PortA::REGS, PortE::REGS, PortG::REGS] {
            assert!(regs.port.is_bit_addressable());
        }
    }

    fn isr_sets_pin_49() {
        OutputPin::<49>::new(true);
    }

    #[test]
    fn extended_port_bit_write_survives_interrupt() {
        // Pins 42 and 49 are bits 7 and 0 of port L
        let mut pin = OutputPin::<42>::new(false);
        let _ = OutputPin::<49>::new(false);
        sim::arm_interrupt(isr_sets_pin_49);
        pin.set();
        assert!(!sim::interrupt_pending());
        assert_eq!(sim::peek(PortL::REGS.port.addr()), 0b1000_0001);
    }
}
