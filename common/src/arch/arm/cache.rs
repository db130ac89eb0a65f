//! Cache and barrier maintenance needed after patching instructions.
//!
//! On ARMv6 the data and instruction caches are not coherent: a word
//! written through the data side stays invisible to instruction fetch
//! until the D-cache is cleaned and the I-cache invalidated.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        /// Clean the entire data cache and invalidate the entire
        /// instruction cache, then drain the write buffer.
        #[inline(always)]
        pub fn sync_instruction_cache() {
            unsafe {
                core::arch::asm!(
                    "mcr p15, 0, {zero}, c7, c10, 0", // clean D-cache
                    "mcr p15, 0, {zero}, c7, c5, 0",  // invalidate I-cache
                    "mcr p15, 0, {zero}, c7, c5, 6",  // flush branch target cache
                    "mcr p15, 0, {zero}, c7, c10, 4", // data synchronization barrier
                    zero = in(reg) 0u32,
                    options(nostack, preserves_flags),
                );
            }
        }
    } else {
        /// Host builds have coherent caches; nothing to do.
        #[inline(always)]
        pub fn sync_instruction_cache() {}
    }
}
