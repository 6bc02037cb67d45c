//! # Host simulation of the AVR I/O space
//!
//! With the `sim` feature (and in the crate's own tests),
//! [`Reg`](crate::gpio::Reg) accesses land in this module instead of real
//! memory. Each thread owns its own simulated chip, so tests running in
//! parallel do not see each other's registers.
//!
//! The model covers what the pin and port accessors depend on:
//!
//! - `PINx` reads return the `PORTx` latch, except for bits an external
//!   circuit drives (see [`drive`] and [`float`]). Outputs and pulled-up
//!   inputs therefore read their latch and floating inputs read low.
//! - Writing 1 to a `PINx` bit toggles the `PORTx` bit on boards where the
//!   hardware does so.
//! - The global interrupt flag of `SREG`. It starts set, as after the
//!   runtime's `sei`. Critical sections clear it and restore the previous
//!   value on exit. This module registers the [`critical_section`]
//!   implementation. It masks the simulated interrupts of the calling thread
//!   only and gives no exclusion between threads.
//! - One armed interrupt handler (see [`arm_interrupt`]). It fires right
//!   after the next register read made with interrupts enabled, or as soon as
//!   interrupts are enabled again. That is exactly between the read and the
//!   write of a read-modify-write sequence.
//!
//! ```
//! use avr_fastio::board::PortB;
//! use avr_fastio::gpio::{InputPort, PortId};
//! use avr_fastio::sim;
//!
//! let port = InputPort::<PortB>::new(false);
//! sim::drive(PortB::REGS, 0x0F, 0x05);
//! assert_eq!(port.read(), 0x05);
//! ```

use crate::board;
use crate::gpio::PortRegisters;
use core::cell::{Cell, RefCell};

/// Size of the simulated data space, covering the extended I/O registers
const DATA_SPACE: usize = 0x200;

struct Chip {
    mem: [u8; DATA_SPACE],
    /// Bits held by external circuitry, indexed by `PINx` address
    forced: [u8; DATA_SPACE],
    /// Level of the forced bits, indexed by `PINx` address
    level: [u8; DATA_SPACE],
}

impl Chip {
    const fn new() -> Self {
        Chip {
            mem: [0; DATA_SPACE],
            forced: [0; DATA_SPACE],
            level: [0; DATA_SPACE],
        }
    }

    fn load(&self, addr: u16) -> u8 {
        let a = index(addr);
        match port_of(addr) {
            Some(regs) => {
                let latch = self.mem[index(regs.port.addr())];
                (latch & !self.forced[a]) | (self.level[a] & self.forced[a])
            }
            None => self.mem[a],
        }
    }

    fn store(&mut self, addr: u16, value: u8) {
        match port_of(addr) {
            Some(regs) if board::PIN_WRITE_TOGGLES => {
                self.mem[index(regs.port.addr())] ^= value;
            }
            // Read-only input register
            Some(_) => {}
            None => self.mem[index(addr)] = value,
        }
    }
}

std::thread_local! {
    static CHIP: RefCell<Chip> = const { RefCell::new(Chip::new()) };
    static INTERRUPTS_ENABLED: Cell<bool> = const { Cell::new(true) };
    static PENDING: Cell<Option<fn()>> = const { Cell::new(None) };
    static ACCESSES: Cell<usize> = const { Cell::new(0) };
}

fn index(addr: u16) -> usize {
    let a = usize::from(addr);
    assert!(a < DATA_SPACE, "address {addr:#05x} outside the simulated I/O space");
    a
}

/// Registers of the port whose `PINx` register sits at `addr`
fn port_of(addr: u16) -> Option<PortRegisters> {
    board::PORTS.iter().copied().find(|regs| regs.pin.addr() == addr)
}

fn count_access() {
    ACCESSES.with(|n| n.set(n.get() + 1));
}

/// Run the armed handler if interrupts are enabled. The handler runs with
/// interrupts disabled, as on hardware, and no borrow of the chip is held.
fn service_interrupt() {
    if !interrupts_enabled() {
        return;
    }
    if let Some(isr) = PENDING.with(Cell::take) {
        INTERRUPTS_ENABLED.with(|i| i.set(false));
        isr();
        INTERRUPTS_ENABLED.with(|i| i.set(true));
    }
}

//==================================================================================================
//  Register access
//==================================================================================================

pub(crate) fn read(addr: u16) -> u8 {
    count_access();
    let value = CHIP.with(|chip| chip.borrow().load(addr));
    service_interrupt();
    value
}

pub(crate) fn write(addr: u16, value: u8) {
    count_access();
    CHIP.with(|chip| chip.borrow_mut().store(addr, value));
}

/// Single-instruction update, as done by `sbi`/`cbi`. No interrupt can hit
/// between the read and the write.
pub(crate) fn update(addr: u16, f: impl FnOnce(u8) -> u8) {
    count_access();
    CHIP.with(|chip| {
        let mut chip = chip.borrow_mut();
        let value = f(chip.load(addr));
        chip.store(addr, value);
    });
}

//==================================================================================================
//  Test bench
//==================================================================================================

/// Raw content of the register at `addr`. `PINx` addresses report the pin
/// levels. Not counted as an access and never fires an interrupt.
pub fn peek(addr: u16) -> u8 {
    CHIP.with(|chip| chip.borrow().load(addr))
}

/// Overwrite the register at `addr` without side effects
pub fn poke(addr: u16, value: u8) {
    CHIP.with(|chip| chip.borrow_mut().mem[index(addr)] = value);
}

/// Hold the bits in `mask` of port `regs` at `level`, as an external circuit
/// would. Overrides the output latch.
pub fn drive(regs: PortRegisters, mask: u8, level: u8) {
    let a = index(regs.pin.addr());
    CHIP.with(|chip| {
        let mut chip = chip.borrow_mut();
        chip.forced[a] |= mask;
        chip.level[a] = (chip.level[a] & !mask) | (level & mask);
    });
}

/// Release the bits in `mask` of port `regs`
pub fn float(regs: PortRegisters, mask: u8) {
    let a = index(regs.pin.addr());
    CHIP.with(|chip| chip.borrow_mut().forced[a] &= !mask);
}

/// Arm `isr` to preempt the main flow once. Replaces a handler that has not
/// fired yet.
pub fn arm_interrupt(isr: fn()) {
    PENDING.with(|p| p.set(Some(isr)));
}

pub fn disarm_interrupt() {
    PENDING.with(|p| p.set(None));
}

/// An armed handler has not fired yet
pub fn interrupt_pending() -> bool {
    PENDING.with(|p| p.get().is_some())
}

/// The `I` flag of `SREG`
pub fn interrupts_enabled() -> bool {
    INTERRUPTS_ENABLED.with(Cell::get)
}

/// `sei`/`cli`. Enabling fires a pending handler.
pub fn set_interrupts_enabled(enabled: bool) {
    INTERRUPTS_ENABLED.with(|i| i.set(enabled));
    service_interrupt();
}

/// Number of register reads and writes made through [`Reg`] so far
///
/// [`Reg`]: crate::gpio::Reg
pub fn access_count() -> usize {
    ACCESSES.with(Cell::get)
}

//==================================================================================================
//  Critical section
//==================================================================================================

struct SimCriticalSection;
critical_section::set_impl!(SimCriticalSection);

// Masks the calling thread's simulated interrupts only

unsafe impl critical_section::Impl for SimCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let sreg = interrupts_enabled() as u8;
        INTERRUPTS_ENABLED.with(|i| i.set(false));
        sreg
    }

    unsafe fn release(sreg: critical_section::RawRestoreState) {
        if sreg != 0 {
            set_interrupts_enabled(true);
        }
    }
}
