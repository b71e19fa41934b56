//! Whole-module compilation.
//!
//! Globals compile first, in declaration order: each initializer lowers into
//! a program-level init buffer ending in a `GSTORE`, and that buffer is
//! spliced into the entry function right after its header word. Functions
//! then compile in two passes so forward references and recursion resolve:
//! pass A registers every signature, pass B lowers bodies in index order.
//!
//! A body is laid out as: header word (total frame slots, written only when
//! non-zero), the global-init splice (entry function only), the argument
//! preamble (`STORE n-1 .. STORE 0`, matching the caller's left-to-right
//! pushes), then the compiled statements.

use indexmap::IndexMap;
use tracing::{debug, trace};

use tern_bytecode::{CodeBuf, CompiledProgram, Op};

use crate::ast::Module;
use crate::codegen::{compile_stmt, ConstPool, ExprCx};
use crate::error::CompileError;
use crate::symbols::{FunctionScope, LocalVar, ProgramScope};

/// Compile a module into an executable program.
///
/// # Errors
///
/// Returns the first [`CompileError`] encountered; compilation does not
/// recover or collect multiple diagnostics.
pub fn compile(module: &Module) -> Result<CompiledProgram, CompileError> {
    let mut program = ProgramScope::new();
    let mut consts = ConstPool::new();
    let mut init_code = CodeBuf::new();

    for global in &module.globals {
        if global.ty.is_void() {
            return Err(CompileError::VoidVariable {
                name: global.name.clone(),
            });
        }
        let slot = program.declare_global(&global.name, global.ty.clone())?;
        if let Some(init) = &global.init {
            let mut cx = ExprCx {
                program: &program,
                scope: None,
                consts: &mut consts,
            };
            let found = cx.compile_expr(init, &mut init_code)?;
            if found != global.ty {
                return Err(CompileError::TypeMismatch {
                    expected: global.ty.clone(),
                    found,
                });
            }
            init_code.write_op(Op::GStore)?;
            init_code.write(u64::from(slot))?;
        }
        trace!(global = %global.name, slot, "declared global");
    }

    // pass A: register every signature before lowering any body
    let mut main = None;
    for decl in &module.functions {
        let mut args = IndexMap::new();
        for (slot, param) in decl.params.iter().enumerate() {
            if param.ty.is_void() {
                return Err(CompileError::VoidVariable {
                    name: param.name.clone(),
                });
            }
            let previous = args.insert(
                param.name.clone(),
                LocalVar {
                    name: param.name.clone(),
                    ty: param.ty.clone(),
                    slot: slot as u32,
                },
            );
            if previous.is_some() {
                return Err(CompileError::DuplicateArgument {
                    name: param.name.clone(),
                });
            }
        }
        let index = program.declare_function(&decl.name, decl.return_type.clone(), args);
        if decl.name == "main" && decl.params.is_empty() {
            main = Some(index);
        }
        trace!(function = %decl.name, index, "registered signature");
    }
    let main = main.ok_or(CompileError::MissingMain)?;

    // pass B: lower bodies in index order
    let mut functions = Vec::with_capacity(module.functions.len());
    for (index, decl) in module.functions.iter().enumerate() {
        let index = index as u32;
        let mut scope = FunctionScope::for_function(program.function(index));
        let mut code = CodeBuf::new();
        code.write(0)?;
        if index == main {
            code.append(&init_code)?;
        }
        let arg_count = program.function(index).args.len();
        for slot in (0..arg_count).rev() {
            code.write_op(Op::Store)?;
            code.write(slot as u64)?;
        }
        for stmt in &decl.body {
            compile_stmt(&program, &mut consts, &mut scope, stmt, &mut code)?;
        }
        let slots = scope.slot_count();
        if slots != 0 {
            code.write_at(0, u64::from(slots));
        }
        debug!(function = %decl.name, index, words = code.len(), slots, "compiled body");
        functions.push(code.finish());
    }

    debug!(
        functions = functions.len(),
        globals = program.global_count(),
        constants = consts.len(),
        main,
        "compiled module"
    );

    Ok(CompiledProgram {
        main,
        constants: consts.into_vec(),
        globals: vec![0; program.global_count()],
        functions,
    })
}
