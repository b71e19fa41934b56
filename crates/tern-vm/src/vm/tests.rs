use super::*;
use tern_bytecode::Op;

fn w(op: Op) -> u64 {
    op.word()
}

fn program_with(globals: Vec<u64>, functions: Vec<Vec<u64>>) -> CompiledProgram {
    CompiledProgram {
        main: 0,
        constants: vec![],
        globals,
        functions: functions.into_iter().map(Vec::into_boxed_slice).collect(),
    }
}

fn program(functions: Vec<Vec<u64>>) -> CompiledProgram {
    program_with(vec![], functions)
}

fn capture(vm: &mut Vm<'_>) -> Result<String, RuntimeError> {
    let mut out = Vec::new();
    vm.run_with_output(&mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn remainder_prints_one() {
    let program = program(vec![vec![
        0,
        w(Op::Push),
        7,
        w(Op::Push),
        2,
        w(Op::LRem),
        w(Op::LPrint),
    ]]);
    let mut vm = Vm::new(&program);
    assert_eq!(capture(&mut vm).unwrap(), "1");
    assert_eq!(vm.stack_depth(), 0);
}

#[test]
fn double_addition_through_bit_patterns() {
    let program = program_with(
        vec![0],
        vec![vec![
            0,
            w(Op::Push),
            2,
            w(Op::L2d),
            w(Op::Push),
            1.5f64.to_bits(),
            w(Op::DAdd),
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(f64::from_bits(vm.globals()[0]), 3.5);
}

#[test]
fn integer_division_by_zero_is_fatal() {
    let program = program(vec![vec![
        0,
        w(Op::Push),
        5,
        w(Op::Push),
        0,
        w(Op::LDiv),
    ]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::DivisionByZero)
    ));
}

#[test]
fn double_division_by_zero_follows_ieee() {
    let program = program_with(
        vec![0],
        vec![vec![
            0,
            w(Op::Push),
            5.0f64.to_bits(),
            w(Op::Push),
            0.0f64.to_bits(),
            w(Op::DDiv),
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(f64::from_bits(vm.globals()[0]), f64::INFINITY);
}

#[test]
fn unknown_opcode_is_fatal() {
    let program = program(vec![vec![0, 999]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::UnknownOpcode { word: 999 })
    ));
}

#[test]
fn operand_stack_respects_its_ceiling() {
    let program = program(vec![vec![
        0,
        w(Op::Push),
        1,
        w(Op::Push),
        2,
        w(Op::Push),
        3,
    ]]);
    let limits = ExecLimits {
        max_stack_bytes: 16,
        ..ExecLimits::default()
    };
    let mut vm = Vm::with_limits(&program, limits);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::StackOverflow { limit: 2 })
    ));
}

#[test]
fn self_invocation_overflows_the_call_stack() {
    let program = program(vec![vec![0, w(Op::Invoke), 0]]);
    let limits = ExecLimits {
        max_call_depth: 8,
        ..ExecLimits::default()
    };
    let mut vm = Vm::with_limits(&program, limits);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::CallStackOverflow { limit: 8 })
    ));
}

#[test]
fn return_skips_the_rest_of_the_body() {
    let program = program_with(
        vec![0],
        vec![vec![
            0,
            w(Op::Push),
            1,
            w(Op::GStore),
            0,
            w(Op::Return),
            w(Op::Push),
            2,
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0], 1);
}

#[test]
fn locals_are_per_frame_slots() {
    let program = program_with(
        vec![0, 0],
        vec![vec![
            2,
            w(Op::Push),
            11,
            w(Op::Store),
            0,
            w(Op::Push),
            22,
            w(Op::Store),
            1,
            w(Op::Load),
            0,
            w(Op::GStore),
            0,
            w(Op::Load),
            1,
            w(Op::GStore),
            1,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals(), &[11, 22]);
}

#[test]
fn callee_leaves_its_return_value_for_the_caller() {
    let program = CompiledProgram {
        main: 0,
        constants: vec![],
        globals: vec![0],
        functions: vec![
            vec![0, w(Op::Invoke), 1, w(Op::GStore), 0].into_boxed_slice(),
            vec![0, w(Op::Push), 42, w(Op::Return)].into_boxed_slice(),
        ],
    };
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0], 42);
    assert_eq!(vm.stack_depth(), 0);
}

#[test]
fn falling_off_the_end_returns_implicitly() {
    let program = CompiledProgram {
        main: 0,
        constants: vec![],
        globals: vec![0],
        functions: vec![
            vec![0, w(Op::Invoke), 1, w(Op::GStore), 0].into_boxed_slice(),
            // no RETURN at all
            vec![0, w(Op::Push), 7].into_boxed_slice(),
        ],
    };
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0], 7);
}

#[test]
fn string_print_indexes_the_constant_pool() {
    let program = CompiledProgram {
        main: 0,
        constants: vec!["hi".to_owned()],
        globals: vec![],
        functions: vec![vec![0, w(Op::Ldc), 0, w(Op::SPrint)].into_boxed_slice()],
    };
    let mut vm = Vm::new(&program);
    assert_eq!(capture(&mut vm).unwrap(), "hi");
}

#[test]
fn bad_constant_index_is_fatal() {
    let program = program(vec![vec![0, w(Op::Push), 3, w(Op::SPrint)]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::InvalidConstant { index: 3 })
    ));
}

#[test]
fn truncated_operand_is_fatal() {
    let program = program(vec![vec![0, w(Op::Push)]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::TruncatedInstruction { offset: 1 })
    ));
}

#[test]
fn unknown_function_index_is_fatal() {
    let program = program(vec![vec![0, w(Op::Invoke), 7]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::UnknownFunction { index: 7 })
    ));
}

#[test]
fn popping_an_empty_stack_is_fatal() {
    let program = program(vec![vec![0, w(Op::Pop)]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(capture(&mut vm), Err(RuntimeError::StackUnderflow)));
}

#[test]
fn bad_slots_are_fatal() {
    let program = program(vec![vec![0, w(Op::Push), 1, w(Op::Store), 5]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::InvalidSlot { slot: 5 })
    ));

    let program = program_with(vec![], vec![vec![0, w(Op::Push), 1, w(Op::GStore), 0]]);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        capture(&mut vm),
        Err(RuntimeError::InvalidGlobalSlot { slot: 0 })
    ));
}

#[test]
fn negative_values_print_signed() {
    let program = program(vec![vec![
        0,
        w(Op::Push),
        3,
        w(Op::LNeg),
        w(Op::LPrint),
    ]]);
    let mut vm = Vm::new(&program);
    assert_eq!(capture(&mut vm).unwrap(), "-3");
}

#[test]
fn integer_arithmetic_wraps() {
    let program = program_with(
        vec![0],
        vec![vec![
            0,
            w(Op::Push),
            i64::MAX as u64,
            w(Op::Push),
            1,
            w(Op::LAdd),
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0] as i64, i64::MIN);
}

#[test]
fn d2l_truncates_toward_zero() {
    let program = program_with(
        vec![0],
        vec![vec![
            0,
            w(Op::Push),
            (-2.7f64).to_bits(),
            w(Op::D2l),
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0] as i64, -2);
}

#[test]
fn each_run_starts_from_the_program_globals() {
    let program = program_with(
        vec![5],
        vec![vec![
            0,
            w(Op::GLoad),
            0,
            w(Op::Push),
            1,
            w(Op::LAdd),
            w(Op::GStore),
            0,
        ]],
    );
    let mut vm = Vm::new(&program);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0], 6);
    // the program is untouched and a rerun is not cumulative
    assert_eq!(program.globals[0], 5);
    vm.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(vm.globals()[0], 6);
}
