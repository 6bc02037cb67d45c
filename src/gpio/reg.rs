use super::pins::PinBinding;
use super::ports::PortRegisters;
use crate::board;

/// Data-space addresses below this are reachable by `SBI`/`CBI`, which makes
/// single-bit updates of those registers one uninterruptible instruction.
const BIT_ADDRESSABLE_END: u16 = 0x40;

//==================================================================================================
//  Reg
//==================================================================================================

/// A memory-mapped 8-bit I/O register, named by its data-space address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reg(u16);

impl Reg {
    #[inline(always)]
    pub const fn at(addr: u16) -> Self {
        Reg(addr)
    }

    #[inline(always)]
    pub const fn addr(self) -> u16 {
        self.0
    }

    /// `SBI`/`CBI` can address this register
    #[inline(always)]
    pub const fn is_bit_addressable(self) -> bool {
        self.0 < BIT_ADDRESSABLE_END
    }

    #[cfg(not(any(test, feature = "sim")))]
    #[inline(always)]
    pub(crate) fn read(self) -> u8 {
        // Safety: the address comes from a board table entry of the selected
        // chip and names an 8-bit I/O register
        unsafe { core::ptr::read_volatile(self.0 as *const u8) }
    }

    #[cfg(not(any(test, feature = "sim")))]
    #[inline(always)]
    pub(crate) fn write(self, value: u8) {
        // Safety: see `read`
        unsafe { core::ptr::write_volatile(self.0 as *mut u8, value) }
    }

    #[cfg(any(test, feature = "sim"))]
    #[inline(always)]
    pub(crate) fn read(self) -> u8 {
        crate::sim::read(self.0)
    }

    #[cfg(any(test, feature = "sim"))]
    #[inline(always)]
    pub(crate) fn write(self, value: u8) {
        crate::sim::write(self.0, value)
    }

    /// Read-modify-write. Not atomic on its own.
    #[inline(always)]
    pub(crate) fn modify(self, f: impl FnOnce(u8) -> u8) {
        self.write(f(self.read()))
    }

    /// Set or clear the bits in `mask`, leaving every other bit untouched even
    /// if an interrupt handler writes the same register concurrently
    #[inline(always)]
    pub(crate) fn write_bits(self, mask: u8, set: bool) {
        if self.is_bit_addressable() {
            self.bit_instruction(mask, set);
        } else {
            critical_section::with(|_| {
                self.modify(|r| if set { r | mask } else { r & !mask })
            });
        }
    }

    /// Same as [`write_bits`](Self::write_bits) for a register or mask only
    /// known at run time. `sbi`/`cbi` encode both as immediates, so the
    /// update is a load and a store and runs in a critical section.
    #[inline(always)]
    pub(crate) fn write_bits_protected(self, mask: u8, set: bool) {
        critical_section::with(|_| self.modify(|r| if set { r | mask } else { r & !mask }));
    }

    // With a constant single-bit mask and an address below 0x40 this
    // compiles to `sbi`/`cbi`
    #[cfg(not(any(test, feature = "sim")))]
    #[inline(always)]
    fn bit_instruction(self, mask: u8, set: bool) {
        self.modify(|r| if set { r | mask } else { r & !mask })
    }

    #[cfg(any(test, feature = "sim"))]
    #[inline(always)]
    fn bit_instruction(self, mask: u8, set: bool) {
        crate::sim::update(self.0, |r| if set { r | mask } else { r & !mask })
    }
}

//==================================================================================================
// Register Interface
//==================================================================================================

/// Provide a safe register interface for single pins
///
/// Implementers supply the [`PinBinding`] through the [`binding`] function.
/// The remaining functions touch only the bit of that binding. For type-level
/// pins the binding is an associated constant, so every function folds into
/// one or two register instructions.
///
/// # Safety
///
/// Users should only implement the [`binding`] function. No default function
/// implementations should be overridden. No two live implementers may claim
/// the same pin.
///
/// [`binding`]: Self::binding
pub(super) unsafe trait RegisterInterface {
    fn binding(&self) -> PinBinding;

    #[inline(always)]
    fn mask(&self) -> u8 {
        1 << self.binding().bit
    }

    /// Configure the pin as output (`true`) or input (`false`)
    #[inline(always)]
    fn set_dir(&mut self, output: bool) {
        let mask = self.mask();
        self.binding().regs.ddr.write_bits(mask, output);
    }

    /// Drive the output latch, or switch the pull-up of an input
    #[inline(always)]
    fn write_pin(&mut self, bit: bool) {
        let mask = self.mask();
        self.binding().regs.port.write_bits(mask, bit);
    }

    /// [`write_pin`](Self::write_pin) for bindings held at run time
    #[inline(always)]
    fn write_pin_protected(&mut self, bit: bool) {
        let mask = self.mask();
        self.binding().regs.port.write_bits_protected(mask, bit);
    }

    /// Electrical level of the pin
    #[inline(always)]
    fn read_pin(&self) -> bool {
        let b = self.binding();
        (b.regs.pin.read() >> b.bit) & 0x01 == 1
    }

    /// Level last written to the output latch
    #[inline(always)]
    fn read_latch(&self) -> bool {
        let b = self.binding();
        (b.regs.port.read() >> b.bit) & 0x01 == 1
    }

    #[inline(always)]
    fn toggle(&mut self) {
        if board::PIN_WRITE_TOGGLES {
            // Zero bits written to PINx have no effect, so the write is atomic
            // without a read
            self.binding().regs.pin.write(self.mask());
        } else {
            toggle_by_rmw(self.binding().regs, self.mask());
        }
    }
}

/// Toggle for chips where writing `PINx` does not toggle the output
#[inline(always)]
pub(super) fn toggle_by_rmw(regs: PortRegisters, mask: u8) {
    critical_section::with(|_| regs.port.modify(|r| r ^ mask));
}

/// Provide a register interface for a contiguous bit range of one port
///
/// # Safety
///
/// Users should only implement [`regs`], [`MASK`] and [`START`]. No two live
/// implementers may claim overlapping bits of the same port.
///
/// [`regs`]: Self::regs
/// [`MASK`]: Self::MASK
/// [`START`]: Self::START
pub(super) unsafe trait PortInterface {
    const MASK: u8;
    const START: u8;

    fn regs(&self) -> PortRegisters;

    /// Start-up configuration, executed before interrupt handlers depend on
    /// the port, so a plain read-modify-write is enough
    #[inline(always)]
    fn configure_input(&mut self, pull_up: bool) {
        let regs = self.regs();
        regs.ddr.modify(|r| r & !Self::MASK);
        regs.port.modify(|r| r & !Self::MASK);
        if pull_up {
            regs.port.modify(|r| r | Self::MASK);
        }
    }

    #[inline(always)]
    fn configure_output(&mut self) {
        let ddr = self.regs().ddr;
        if Self::MASK == 0xFF {
            ddr.write(0xFF);
        } else {
            critical_section::with(|_| ddr.modify(|r| r | Self::MASK));
        }
    }

    #[inline(always)]
    fn read_input(&self) -> u8 {
        (self.regs().pin.read() & Self::MASK) >> Self::START
    }

    #[inline(always)]
    fn read_latch(&self) -> u8 {
        (self.regs().port.read() & Self::MASK) >> Self::START
    }

    /// Write `value` into the range. A partial range is merged into `PORTx`
    /// with interrupts suspended, so neither neighbouring bits nor bits an
    /// interrupt handler writes are lost.
    #[inline(always)]
    fn write_latch(&mut self, value: u8) {
        let port = self.regs().port;
        if Self::MASK == 0xFF {
            port.write(value);
        } else {
            let shifted = value << Self::START;
            critical_section::with(|_| {
                let current = port.read();
                port.write((current & !Self::MASK) | (shifted & Self::MASK));
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PortB;
    use crate::gpio::PortId;
    use crate::sim;

    #[test]
    fn bit_addressable_range() {
        assert!(Reg::at(0x23).is_bit_addressable());
        assert!(Reg::at(0x3F).is_bit_addressable());
        assert!(!Reg::at(0x40).is_bit_addressable());
        assert!(!Reg::at(0x102).is_bit_addressable());
    }

    #[test]
    fn write_bits_keeps_neighbours() {
        let port = PortB::REGS.port;
        sim::poke(port.addr(), 0b1010_0000);
        port.write_bits(0b0000_0001, true);
        assert_eq!(sim::peek(port.addr()), 0b1010_0001);
        port.write_bits(0b1000_0000, false);
        assert_eq!(sim::peek(port.addr()), 0b0010_0001);
    }

    #[test]
    fn extended_register_bits_are_protected() {
        // 0x10B is PORTL on the Mega, and plain RAM on the smaller chips
        let reg = Reg::at(0x10B);
        sim::poke(reg.addr(), 0b0000_1111);
        sim::arm_interrupt(|| sim::poke(0x10B, sim::peek(0x10B) | 0b0100_0000));
        reg.write_bits(0b1000_0000, true);
        assert!(sim::interrupts_enabled());
        assert!(!sim::interrupt_pending());
        assert_eq!(sim::peek(reg.addr()), 0b1100_1111);
    }

    #[test]
    fn protected_write_defers_interrupt() {
        let port = PortB::REGS.port;
        sim::poke(port.addr(), 0);
        sim::arm_interrupt(|| {
            let port = PortB::REGS.port.addr();
            sim::poke(port, sim::peek(port) | 0b0000_0001);
        });
        port.write_bits_protected(0b0010_0000, true);
        assert!(!sim::interrupt_pending());
        assert_eq!(sim::peek(port.addr()), 0b0010_0001);
    }

    #[test]
    fn rmw_toggle_fallback() {
        let regs = PortB::REGS;
        sim::poke(regs.port.addr(), 0b0000_0101);
        toggle_by_rmw(regs, 0b0000_0100);
        assert_eq!(sim::peek(regs.port.addr()), 0b0000_0001);
        toggle_by_rmw(regs, 0b0000_0100);
        assert_eq!(sim::peek(regs.port.addr()), 0b0000_0101);
    }
}
