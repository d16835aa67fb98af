//! The MIPS assembly emitter (§6.3): a shallow format-and-print step that
//! turns the evaluator's `(payload, type)` pairs into a simulator-ready
//! assembly stub beginning with `main:`. Every output gets a `$v0`/`$a0`
//! syscall pair (or, for `Bool`, a run of them spelling `True`/`False`
//! one character at a time) — no register allocation, no control flow.

use std::fmt::Write as _;

use yac_core::Type;

/// Renders `outputs` — the evaluator's recorded `(payload, type)` pairs, in
/// the order the corresponding output expressions appeared in source — into
/// a complete assembly listing.
pub fn emit(outputs: &[(i32, Type)]) -> String {
    let mut asm = String::from("main:");
    for (payload, ty) in outputs {
        match ty {
            Type::Int => emit_int(&mut asm, *payload as u32),
            Type::Char => emit_char(&mut asm, *payload),
            Type::Bool => emit_bool(&mut asm, *payload != 0),
            Type::Undefined | Type::Function(_) => {
                unreachable!("checker guarantees every output is a non-function primitive")
            }
        }
    }
    asm
}

fn syscall(asm: &mut String, v0: u32, a0: i32) {
    let _ = write!(asm, "\n\taddiu $v0, $zero, {v0}");
    let _ = write!(asm, "\n\taddiu $a0, $zero, {a0}");
    asm.push_str("\n\tsyscall");
}

/// §6.3: a value that doesn't fit in 16 bits needs its high half loaded
/// with `lui` before the low half is added in. The print syscall is issued
/// before the high half is loaded, matching the original emitter's
/// instruction order exactly.
fn emit_int(asm: &mut String, value: u32) {
    let lo = (value & 0x0000_ffff) as i32;
    if value > 0x0000_ffff {
        let hi = (value & 0xffff_0000) >> 16;
        asm.push_str("\n\taddiu $v0, $zero, 1");
        let _ = write!(asm, "\n\tlui $a0, {hi}");
        let _ = write!(asm, "\n\taddiu $a0, $a0, {lo}");
        asm.push_str("\n\tsyscall");
    } else {
        syscall(asm, 1, lo);
    }
}

/// The original emitter narrows the payload to a (signed, 8-bit) `char`
/// before printing it; a code point outside that range wraps the same way.
fn emit_char(asm: &mut String, payload: i32) {
    syscall(asm, 11, payload as i8 as i32);
}

fn emit_bool(asm: &mut String, value: bool) {
    let word = if value { "True" } else { "False" };
    for ch in word.chars() {
        syscall(asm, 11, ch as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_int_uses_a_single_addiu() {
        let asm = emit(&[(14, Type::Int)]);
        assert_eq!(
            asm,
            "main:\n\taddiu $v0, $zero, 1\n\taddiu $a0, $zero, 14\n\tsyscall"
        );
    }

    #[test]
    fn large_int_loads_the_high_half_with_lui() {
        let asm = emit(&[(0x0001_0000, Type::Int)]);
        assert_eq!(
            asm,
            "main:\n\taddiu $v0, $zero, 1\n\tlui $a0, 1\n\taddiu $a0, $a0, 0\n\tsyscall"
        );
    }

    #[test]
    fn negative_int_is_treated_as_unsigned() {
        let asm = emit(&[(-1, Type::Int)]);
        assert!(asm.contains("lui $a0, 65535"));
        assert!(asm.contains("addiu $a0, $a0, 65535"));
    }

    #[test]
    fn char_uses_syscall_eleven() {
        let asm = emit(&[('y' as i32, Type::Char)]);
        assert_eq!(
            asm,
            "main:\n\taddiu $v0, $zero, 11\n\taddiu $a0, $zero, 121\n\tsyscall"
        );
    }

    #[test]
    fn bool_spells_true_or_false_one_char_at_a_time() {
        let asm = emit(&[(1, Type::Bool)]);
        assert_eq!(asm.matches("syscall").count(), 4);
        assert!(asm.contains(&format!("{}", 'T' as i32)));

        let asm = emit(&[(0, Type::Bool)]);
        assert_eq!(asm.matches("syscall").count(), 5);
        assert!(asm.contains(&format!("{}", 'F' as i32)));
    }

    #[test]
    fn multiple_outputs_append_in_order() {
        let asm = emit(&[(1, Type::Int), (2, Type::Int)]);
        assert_eq!(asm.matches("syscall").count(), 2);
    }
}
