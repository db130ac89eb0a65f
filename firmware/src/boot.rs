//! Reset entry and exception vectors.

use core::arch::global_asm;

// The GPU firmware enters `_start` in SVC mode. Each exception mode gets a
// small stack for the few words the trap entry spills; the monitor itself
// always runs in SVC mode on its own stack.
global_asm!(
    r#"
    .section .text.boot, "ax"
    .arm
    .global _start
_start:
    cpsid if, #0x1b
    ldr sp, =__und_stack_top
    cps #0x17
    ldr sp, =__abt_stack_top
    cps #0x12
    ldr sp, =__irq_stack_top
    cps #0x13
    ldr sp, =__monitor_stack_top

    ldr r0, =__vectors
    mcr p15, 0, r0, c12, c0, 0

    ldr r0, =__bss_start
    ldr r1, =__bss_end
    mov r2, #0
1:
    cmp r0, r1
    strlo r2, [r0], #4
    blo 1b

    bl firmware_main
2:
    wfe
    b 2b
    .ltorg

    .section .text.vectors, "ax"
    .balign 32
    .global __vectors
__vectors:
    ldr pc, =_start
    ldr pc, =__undef_entry
    ldr pc, =__swi_entry
    ldr pc, =__prefetch_abort_entry
    ldr pc, =__data_abort_entry
    b .
    ldr pc, =__irq_entry
    b .
    .ltorg
"#
);
