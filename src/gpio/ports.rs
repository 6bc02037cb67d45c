//! # Multi-bit port accessors
//!
//! [`InputPort`] and [`OutputPort`] cover a contiguous range of bits of one
//! physical port, selected with a port marker type ([`PortB`], ...) and two
//! const generic parameters, the start bit and the width.
//!
//! ```
//! use avr_fastio::board::{PortB, PortD};
//! use avr_fastio::gpio::{InputPort, OutputPort};
//!
//! // Low nibble of PORTB drives a 4-bit bus
//! let mut bus = OutputPort::<PortB, 0, 4>::new();
//! bus.write(0b1010);
//!
//! // All of PORTD as input, pull-ups on
//! let switches = InputPort::<PortD>::new(true);
//! let state: u8 = switches.read();
//! # let _ = state;
//! ```
//!
//! Writes to a partial range run inside a critical section. Interrupt
//! handlers may therefore drive other bits of the same port without their
//! updates being lost. A full-width [`OutputPort`] writes `PORTx` directly.
//!
//! [`PortB`]: crate::board::PortB

use super::reg::{PortInterface, Reg};
use crate::typelevel::BitRange;
use crate::Sealed;
use core::marker::PhantomData;

//==================================================================================================
//  Port registers and IDs
//==================================================================================================

/// The three registers controlling one 8-bit port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortRegisters {
    /// Input register (`PINx`). Reads the pin levels; on the supported chips
    /// writing 1 to a bit toggles the matching `PORTx` bit.
    pub pin: Reg,
    /// Data direction register (`DDRx`), 1 = output
    pub ddr: Reg,
    /// Data register (`PORTx`): output level, or pull-up enable for inputs
    pub port: Reg,
}

impl PortRegisters {
    pub const fn new(pin: u16, ddr: u16, port: u16) -> Self {
        PortRegisters {
            pin: Reg::at(pin),
            ddr: Reg::at(ddr),
            port: Reg::at(port),
        }
    }
}

/// Type-level enum for the physical ports of the selected chip
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not exist on the selected board",
    label = "no such port"
)]
pub trait PortId: Sealed {
    const REGS: PortRegisters;
}

//==================================================================================================
//  InputPort
//==================================================================================================

/// `WIDTH` input bits of port `P`, starting at bit `START`
pub struct InputPort<P: PortId, const START: u8 = 0, const WIDTH: u8 = 8> {
    port: PhantomData<P>,
}

unsafe impl<P: PortId, const START: u8, const WIDTH: u8> PortInterface
    for InputPort<P, START, WIDTH>
{
    const MASK: u8 = BitRange::<START, WIDTH>::MASK;
    const START: u8 = START;

    #[inline(always)]
    fn regs(&self) -> PortRegisters {
        P::REGS
    }
}

impl<P: PortId, const START: u8, const WIDTH: u8> InputPort<P, START, WIDTH> {
    pub const MASK: u8 = BitRange::<START, WIDTH>::MASK;

    /// Configure the bits as inputs and set or clear their pull-ups
    #[inline(always)]
    pub fn new(pull_up: bool) -> Self {
        let mut port = InputPort { port: PhantomData };
        port.configure_input(pull_up);
        port
    }

    /// The input bits, shifted down to bit 0
    #[inline(always)]
    pub fn read(&self) -> u8 {
        self.read_input()
    }
}

impl<P: PortId, const START: u8, const WIDTH: u8> Default for InputPort<P, START, WIDTH> {
    fn default() -> Self {
        Self::new(true)
    }
}

//==================================================================================================
//  OutputPort
//==================================================================================================

/// `WIDTH` output bits of port `P`, starting at bit `START`
pub struct OutputPort<P: PortId, const START: u8 = 0, const WIDTH: u8 = 8> {
    port: PhantomData<P>,
}

unsafe impl<P: PortId, const START: u8, const WIDTH: u8> PortInterface
    for OutputPort<P, START, WIDTH>
{
    const MASK: u8 = BitRange::<START, WIDTH>::MASK;
    const START: u8 = START;

    #[inline(always)]
    fn regs(&self) -> PortRegisters {
        P::REGS
    }
}

impl<P: PortId, const START: u8, const WIDTH: u8> OutputPort<P, START, WIDTH> {
    pub const MASK: u8 = BitRange::<START, WIDTH>::MASK;

    /// Configure the bits as outputs. The output latch keeps its value.
    #[inline(always)]
    pub fn new() -> Self {
        let mut port = OutputPort { port: PhantomData };
        port.configure_output();
        port
    }

    /// Configure the bits as outputs and drive `value`
    #[inline(always)]
    pub fn with_value(value: u8) -> Self {
        let mut port = Self::new();
        port.write(value);
        port
    }

    /// Drive the low `WIDTH` bits of `value` onto the range. Higher bits of
    /// `value` are ignored.
    #[inline(always)]
    pub fn write(&mut self, value: u8) {
        self.write_latch(value)
    }

    /// The value last written to the range, read back from `PORTx`
    #[inline(always)]
    pub fn read(&self) -> u8 {
        self.read_latch()
    }
}

impl<P: PortId, const START: u8, const WIDTH: u8> Default for OutputPort<P, START, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PortB, PortC, PortD};
    use crate::sim;
    use core::cell::Cell;
    use proptest::prelude::*;

    const B: PortRegisters = PortB::REGS;

    #[test]
    fn input_port_configuration() {
        sim::poke(B.ddr.addr(), 0xFF);
        sim::poke(B.port.addr(), 0b1000_0001);
        let _port = InputPort::<PortB, 2, 3>::new(true);
        assert_eq!(sim::peek(B.ddr.addr()), 0b1110_0011);
        assert_eq!(sim::peek(B.port.addr()), 0b1001_1101);

        let _port = InputPort::<PortB, 2, 3>::new(false);
        assert_eq!(sim::peek(B.ddr.addr()), 0b1110_0011);
        assert_eq!(sim::peek(B.port.addr()), 0b1000_0001);
    }

    #[test]
    fn input_port_read_is_masked_and_aligned() {
        let port = InputPort::<PortD, 3, 4>::new(false);
        sim::drive(PortD::REGS, 0xFF, 0b1101_0110);
        assert_eq!(port.read(), 0b1010);
        sim::drive(PortD::REGS, 0xFF, 0b0000_0111);
        assert_eq!(port.read(), 0b0000);
    }

    #[test]
    fn input_port_pull_ups_read_high() {
        let port = InputPort::<PortC, 0, 4>::default();
        assert_eq!(port.read(), 0b1111);
        sim::drive(PortC::REGS, 0b0000_0010, 0);
        assert_eq!(port.read(), 0b1101);
    }

    #[test]
    fn output_port_configuration() {
        sim::poke(B.ddr.addr(), 0b1000_0000);
        let _port = OutputPort::<PortB, 1, 2>::new();
        assert_eq!(sim::peek(B.ddr.addr()), 0b1000_0110);
        let _port = OutputPort::<PortB>::new();
        assert_eq!(sim::peek(B.ddr.addr()), 0xFF);
    }

    #[test]
    fn full_width_write_reaches_input_port() {
        let input = InputPort::<PortB>::new(false);
        let mut output = OutputPort::<PortB>::new();
        output.write(0b1011_0010);
        assert_eq!(sim::peek(B.port.addr()), 0b1011_0010);
        assert_eq!(output.read(), 0b1011_0010);
        assert_eq!(input.read(), 0b1011_0010);
    }

    #[test]
    fn full_width_write_has_no_critical_section() {
        let mut output = OutputPort::<PortB>::new();
        sim::arm_interrupt(|| {});
        let accesses = sim::access_count();
        output.write(0x5A);
        // One register write, the armed interrupt did not get a read to fire on
        assert_eq!(sim::access_count(), accesses + 1);
        assert!(sim::interrupt_pending());
        sim::disarm_interrupt();
    }

    #[test]
    fn partial_write_ignores_excess_value_bits() {
        let mut port = OutputPort::<PortB, 2, 3>::with_value(0xFF);
        assert_eq!(sim::peek(B.port.addr()), 0b0001_1100);
        assert_eq!(port.read(), 0b111);
        port.write(0b1111_1010);
        assert_eq!(port.read(), 0b010);
        assert_eq!(sim::peek(B.port.addr()), 0b0000_1000);
    }

    #[test]
    fn partial_write_preserves_latch_not_pin_levels() {
        let mut low = OutputPort::<PortB, 0, 4>::with_value(0);
        let mut high = OutputPort::<PortB, 4, 4>::with_value(0b1001);
        // External circuitry holds two of the high bits at the opposite level
        sim::drive(B, 0b1111_0000, 0b0110_0000);
        low.write(0b0101);
        sim::float(B, 0xFF);
        assert_eq!(high.read(), 0b1001);
        assert_eq!(sim::peek(B.port.addr()), 0b1001_0101);
        high.write(0);
        assert_eq!(low.read(), 0b0101);
    }

    #[test]
    fn partial_write_restores_disabled_interrupts() {
        let mut port = OutputPort::<PortB, 0, 4>::new();
        sim::set_interrupts_enabled(false);
        port.write(0b0011);
        assert!(!sim::interrupts_enabled());
        sim::set_interrupts_enabled(true);
        port.write(0b0110);
        assert!(sim::interrupts_enabled());
    }

    std::thread_local! {
        static ISR_VALUE: Cell<u8> = const { Cell::new(0) };
    }

    fn isr_writes_high_nibble() {
        OutputPort::<PortB, 4, 4>::new().write(ISR_VALUE.with(Cell::get));
    }

    #[test]
    fn unprotected_rmw_loses_interrupt_write() {
        // The race the critical section prevents, reproduced by hand
        let _ = OutputPort::<PortB>::with_value(0);
        ISR_VALUE.with(|v| v.set(0b1111));
        sim::arm_interrupt(isr_writes_high_nibble);
        let current = B.port.read();
        B.port.write((current & 0xF0) | 0b0001);
        assert_eq!(sim::peek(B.port.addr()), 0b0000_0001);
    }

    #[test]
    fn interrupt_between_read_and_write_is_deferred() {
        let mut low = OutputPort::<PortB, 0, 4>::with_value(0);
        let _high = OutputPort::<PortB, 4, 4>::with_value(0);
        ISR_VALUE.with(|v| v.set(0b1111));
        sim::arm_interrupt(isr_writes_high_nibble);
        low.write(0b0001);
        assert!(!sim::interrupt_pending());
        assert_eq!(sim::peek(B.port.addr()), 0b1111_0001);
    }

    proptest! {
        #[test]
        fn nibble_writes_are_isolated(
            writes in proptest::collection::vec((any::<bool>(), any::<u8>(), any::<bool>(), any::<u8>()), 1..32)
        ) {
            let mut a = OutputPort::<PortB, 0, 4>::with_value(0);
            let mut b = OutputPort::<PortB, 4, 4>::with_value(0);
            let (mut last_a, mut last_b) = (0u8, 0u8);
            for (to_a, value, interrupt, isr_value) in writes {
                if interrupt {
                    ISR_VALUE.with(|v| v.set(isr_value));
                    sim::arm_interrupt(isr_writes_high_nibble);
                }
                if to_a {
                    a.write(value);
                    last_a = value & 0x0F;
                } else {
                    b.write(value);
                    last_b = value & 0x0F;
                }
                if interrupt {
                    // The handler always runs after the main flow's write
                    last_b = isr_value & 0x0F;
                }
                prop_assert!(!sim::interrupt_pending());
                prop_assert_eq!(a.read(), last_a);
                prop_assert_eq!(b.read(), last_b);
                prop_assert_eq!(sim::peek(B.port.addr()), (last_b << 4) | last_a);
            }
        }

        #[test]
        fn partial_write_only_touches_its_mask(initial in any::<u8>(), value in any::<u8>()) {
            let _ = OutputPort::<PortB>::with_value(initial);
            let mut port = OutputPort::<PortB, 2, 5>::new();
            port.write(value);
            let mask = OutputPort::<PortB, 2, 5>::MASK;
            let latch = sim::peek(B.port.addr());
            prop_assert_eq!(latch & !mask, initial & !mask);
            prop_assert_eq!(port.read(), value & 0b1_1111);
        }
    }
}
