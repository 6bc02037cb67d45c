//! # Board pin tables
//!
//! Each supported board maps its logical pin numbers to the port and bit of
//! the microcontroller. Exactly one table is compiled in, selected by the
//! board's Cargo feature:
//!
//! | Feature            | Chip                    | Boards                                   |
//! |--------------------|-------------------------|------------------------------------------|
//! | `arduino-uno`      | ATmega328P              | Uno, Nano, Duemilanove, Mini, Pro, Fio, ...|
//! | `arduino-mega2560` | ATmega2560              | Mega 2560                                |
//! | `sanguino`         | ATmega644P / ATmega1284P| Sanguino                                 |
//!
//! The table is consumed in two forms. At the type level it implements
//! [`PinId`] for every wired [`Digital<N>`], which is what the pin accessors
//! use. At the value level [`lookup`] and [`resolve`] are `const fn`s over the
//! same data.
//!
//! [`PinId`]: crate::gpio::PinId
//! [`Digital<N>`]: crate::gpio::Digital
//!
//! ```
//! use avr_fastio::board::{self, LED_BUILTIN};
//!
//! const LED: avr_fastio::gpio::PinBinding = board::resolve(LED_BUILTIN);
//! assert!(LED.bit < 8);
//! ```

use crate::gpio::{PinBinding, NO_PIN};

/// Declare the ports of a chip as `PortId` marker types and collect them in
/// `PORTS`
macro_rules! ports {
    ($($X:ident: ($pin:literal, $ddr:literal, $port:literal),)+) => {
        paste::paste! {
            $(
                #[doc = "Port " $X ": `PIN" $X "`, `DDR" $X "` and `PORT" $X "`"]
                pub enum [<Port $X>] {}
                impl crate::Sealed for [<Port $X>] {}
                impl PortId for [<Port $X>] {
                    const REGS: PortRegisters = PortRegisters::new($pin, $ddr, $port);
                }
            )+

            /// Every port of the selected chip
            pub const PORTS: &[PortRegisters] = &[$(<[<Port $X>] as PortId>::REGS,)+];
        }
    };
}

/// Bind logical pin numbers to port bits and generate [`lookup`] over them
macro_rules! pins {
    ($($num:literal => $X:ident $bit:literal,)+) => {
        paste::paste! {
            $(
                impl PinId for Digital<$num> {
                    const BINDING: PinBinding =
                        PinBinding::new(<[<Port $X>] as PortId>::REGS, $bit);
                }
            )+
        }

        /// Binding of logical pin `num`, or `None` if the board has no such pin
        pub const fn lookup(num: u8) -> Option<PinBinding> {
            match num {
                $($num => Some(<Digital<$num> as PinId>::BINDING),)+
                _ => None,
            }
        }

        /// Number of wired logical pins
        pub const PIN_COUNT: usize = [$($num,)+].len();
    };
}

#[cfg(feature = "arduino-mega2560")]
mod mega2560;
#[cfg(feature = "arduino-mega2560")]
pub use mega2560::*;

#[cfg(feature = "arduino-uno")]
mod uno;
#[cfg(feature = "arduino-uno")]
pub use uno::*;

#[cfg(feature = "sanguino")]
mod sanguino;
#[cfg(feature = "sanguino")]
pub use sanguino::*;

/// Binding of logical pin `num`
///
/// Meant for `const` items: there, a number without a table entry fails the
/// build. The error points at the `const` item but cannot name the number;
/// the type-level form `<Digital<N> as PinId>::BINDING`, or any pin accessor,
/// reports the missing `Digital<N>` instead. Called at run time with such a
/// number, `resolve` panics.
///
/// ```compile_fail
/// const MISSING: avr_fastio::gpio::PinBinding = avr_fastio::board::resolve(200);
/// ```
pub const fn resolve(num: u8) -> PinBinding {
    match lookup(num) {
        Some(binding) => binding,
        None => panic!("pin number has no entry in the selected board's pin table"),
    }
}

// Table invariants, checked while building
const _: () = {
    assert!(lookup(NO_PIN).is_none(), "NO_PIN must never be wired");
    let mut num: u16 = 0;
    while num < 256 {
        if let Some(b) = lookup(num as u8) {
            let pin = b.regs.pin.addr();
            assert!(pin != 0, "port registers at address 0");
            assert!(
                b.regs.ddr.addr() == pin + 1 && b.regs.port.addr() == pin + 2,
                "port registers not in PINx, DDRx, PORTx order"
            );
        }
        num += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{Digital, PinId};

    #[test]
    fn every_pin_resolves_to_a_valid_binding() {
        let mut wired = 0;
        for num in 0..=u8::MAX {
            let Some(b) = lookup(num) else { continue };
            wired += 1;
            assert!(b.bit <= 7, "pin {num}");
            assert_ne!(b.regs.pin.addr(), 0);
            assert_ne!(b.regs.ddr.addr(), 0);
            assert_ne!(b.regs.port.addr(), 0);
            assert!(PORTS.contains(&b.regs), "pin {num} is not on a known port");
        }
        assert_eq!(wired, PIN_COUNT);
    }

    #[test]
    fn pins_are_contiguous_from_zero() {
        for num in 0..PIN_COUNT as u8 {
            assert!(lookup(num).is_some(), "pin {num}");
        }
        assert!(lookup(PIN_COUNT as u8).is_none());
        assert!(lookup(crate::gpio::NO_PIN).is_none());
    }

    #[test]
    fn no_two_pins_share_a_bit() {
        for a in 0..PIN_COUNT as u8 {
            for b in (a + 1)..PIN_COUNT as u8 {
                assert_ne!(lookup(a), lookup(b), "pins {a} and {b}");
            }
        }
    }

    #[test]
    fn ports_are_distinct() {
        for (i, a) in PORTS.iter().enumerate() {
            for b in &PORTS[i + 1..] {
                assert_ne!(a.pin, b.pin);
            }
        }
    }

    #[test]
    fn resolve_matches_type_level_binding() {
        const LED: PinBinding = resolve(LED_BUILTIN);
        assert_eq!(LED, <Digital<LED_BUILTIN> as PinId>::BINDING);
        assert_eq!(resolve(SCK), <Digital<SCK> as PinId>::BINDING);
        assert_eq!(resolve(SDA), <Digital<SDA> as PinId>::BINDING);
    }

    #[test]
    #[should_panic(expected = "no entry in the selected board's pin table")]
    fn resolve_panics_at_run_time_for_unwired_pin() {
        let _ = resolve(core::hint::black_box(crate::gpio::NO_PIN));
    }

    #[test]
    fn bus_aliases_are_wired() {
        for num in [SS, MOSI, MISO, SCK, SDA, SCL, LED_BUILTIN] {
            assert!(lookup(num).is_some(), "alias {num}");
        }
    }
}
