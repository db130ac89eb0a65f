//! Trampoline between the user program and the monitor.
//!
//! Every exception the program can raise saves its registers into
//! [`TRAP_FRAME`] and calls [`monitor_entry`] on a fresh monitor stack with
//! the matching signal:
//!
//! | exception        | signal  | saved pc              |
//! |------------------|---------|-----------------------|
//! | SWI (trap)       | SIGTRAP | the trap instruction  |
//! | undefined        | SIGILL  | faulting instruction  |
//! | prefetch abort   | SIGSEGV | faulting instruction  |
//! | data abort       | SIGSEGV | faulting instruction  |
//! | IRQ (UART break) | SIGINT  | next instruction      |
//!
//! `switch_back` reloads the frame and returns into the program. Only the
//! user-mode banked `sp` and `lr` are saved, so programs are expected to run
//! in user or system mode.

use crate::{Firmware, Platform, PlatformTrait};
use drivers::hal::interrupt::InterruptController;
use common::arch::arm::ProcessorMode;
use core::arch::global_asm;
use monitor::{RegisterFile, Resume, Signal};

/// Register image shared with the assembly below. Offsets: r0-r12 at 0,
/// sp at 52, lr at 56, pc at 60, cpsr at 164.
#[unsafe(no_mangle)]
static mut TRAP_FRAME: RegisterFile = RegisterFile::zeroed();

global_asm!(
    r#"
    .section .text, "ax"
    .arm

    .macro save_frame adjust, signal
    sub lr, lr, #\adjust
    push {{r0}}
    ldr r0, =TRAP_FRAME
    stmib r0, {{r1-r12}}
    pop {{r1}}
    str r1, [r0]
    str lr, [r0, #60]
    mrs r1, spsr
    str r1, [r0, #164]
    add r1, r0, #52
    stmia r1, {{sp, lr}}^
    nop
    mov r0, #\signal
    b __enter_monitor
    .endm

    .global __undef_entry
__undef_entry:
    save_frame 4, 0x04

    .global __swi_entry
__swi_entry:
    save_frame 4, 0x05

    .global __prefetch_abort_entry
__prefetch_abort_entry:
    save_frame 4, 0x0b

    .global __data_abort_entry
__data_abort_entry:
    save_frame 8, 0x0b

    .global __irq_entry
__irq_entry:
    save_frame 4, 0x02

__enter_monitor:
    cps #0x13
    ldr sp, =__monitor_stack_top
    bl monitor_entry
    b .

    .global switch_back
switch_back:
    ldr r1, [r0, #164]
    msr spsr_cxsf, r1
    add r1, r0, #52
    ldmia r1, {{sp, lr}}^
    nop
    ldr lr, [r0, #60]
    ldmia r0, {{r0-r12}}
    movs pc, lr
    .ltorg
"#
);

unsafe extern "C" {
    fn switch_back(frame: *const RegisterFile) -> !;
}

/// Seed the frame the first resume will load.
pub fn load_initial_state(registers: RegisterFile) {
    // SAFETY: nothing runs concurrently before the first resume.
    unsafe { (&raw mut TRAP_FRAME).write_volatile(registers) };
}

/// Re-entry point: the program stopped, or this is the first entry after
/// boot.
#[unsafe(no_mangle)]
pub extern "C" fn monitor_entry(code: u32) -> ! {
    let signal = u8::try_from(code)
        .ok()
        .and_then(Signal::from_code)
        .unwrap_or(Signal::Trap);

    let Some(mut guard) = crate::FIRMWARE.try_lock() else {
        log::error!("{signal} raised inside the monitor");
        crate::halt();
    };
    let Some(firmware) = guard.as_mut() else {
        log::error!("{signal} before bring-up finished");
        crate::halt();
    };

    if signal == Signal::Interrupt {
        match firmware.interrupts.next_pending() {
            Some(irq) if irq == Platform::console_irq() && firmware.console.break_pending() => {}
            pending => log::warn!("interrupt without a line break, pending {pending:?}"),
        }
    }

    // SAFETY: the trap entry finished writing the frame before branching
    // here and the program is not running.
    firmware.ctx.registers = unsafe { (&raw const TRAP_FRAME).read_volatile() };
    let resume = serve(firmware, signal);
    match firmware.ctx.registers.cpsr().mode() {
        Some(ProcessorMode::User | ProcessorMode::System) => {}
        mode => log::warn!("resuming in {mode:?}; banked sp and lr are not restored"),
    }
    unsafe { (&raw mut TRAP_FRAME).write_volatile(firmware.ctx.registers) };
    log::debug!("switching to {:#010x}", resume.pc());
    drop(guard);

    // SAFETY: the frame holds the state the host left the program in.
    unsafe { switch_back(&raw const TRAP_FRAME) }
}

/// Run the command loop until the host resumes. A transport error (a
/// break or framing error on the line) restarts the loop with the same
/// stop signal.
fn serve(firmware: &mut Firmware, signal: Signal) -> Resume {
    loop {
        match monitor::enter(
            &mut firmware.ctx,
            signal,
            &mut firmware.console,
            &mut firmware.memory,
            &mut firmware.led,
            &firmware.config.monitor,
        ) {
            Ok(resume) => return resume,
            Err(e) => log::warn!("{e}, restarting command loop"),
        }
    }
}
