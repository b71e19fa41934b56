//! Statement and expression lowering.
//!
//! Expressions compile left to right into a [`CodeBuf`], returning the
//! static type of the value they leave on the operand stack (`void` when
//! they leave none). Binary arithmetic compiles its right operand into a
//! scratch buffer so a promotion instruction can be spliced between the two
//! operand sequences without re-evaluating either.

use indexmap::IndexSet;
use tern_bytecode::{CodeBuf, Op};

use crate::ast::{BinOp, Expr, Stmt, UnOp};
use crate::error::CompileError;
use crate::symbols::{lookup_symbol, FunctionScope, ProgramScope, SymbolRef};
use crate::types::{Prim, ValueType};

/// The deduplicated string constant pool, in first-interned order.
#[derive(Debug, Default)]
pub struct ConstPool {
    strings: IndexSet<String>,
}

impl ConstPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its pool index.
    pub fn intern(&mut self, s: &str) -> u32 {
        match self.strings.get_index_of(s) {
            Some(index) => index as u32,
            None => {
                let (index, _) = self.strings.insert_full(s.to_owned());
                index as u32
            }
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.strings.into_iter().collect()
    }
}

/// Lowering context for one expression tree.
///
/// `scope` is `None` while compiling global initializers, which resolve
/// names against file scope only.
pub struct ExprCx<'a> {
    pub program: &'a ProgramScope,
    pub scope: Option<&'a FunctionScope>,
    pub consts: &'a mut ConstPool,
}

impl ExprCx<'_> {
    /// Compile `expr` into `code` and return its static type.
    pub fn compile_expr(&mut self, expr: &Expr, code: &mut CodeBuf) -> Result<ValueType, CompileError> {
        match expr {
            Expr::Int(value) => {
                code.write_op(Op::Push)?;
                code.write_i64(i64::from(*value))?;
                Ok(ValueType::simple(Prim::Int))
            }
            Expr::Long(value) => {
                code.write_op(Op::Push)?;
                code.write_i64(*value)?;
                Ok(ValueType::simple(Prim::Long))
            }
            Expr::Char(value) => {
                code.write_op(Op::Push)?;
                code.write_i64(i64::from(u32::from(*value)))?;
                Ok(ValueType::simple(Prim::Char))
            }
            // float cells hold the 32-bit pattern sign-extended to a word
            Expr::Float(value) => {
                code.write_op(Op::Push)?;
                code.write_i64(i64::from(value.to_bits() as i32))?;
                Ok(ValueType::simple(Prim::Float))
            }
            Expr::Double(value) => {
                code.write_op(Op::Push)?;
                code.write_f64(*value)?;
                Ok(ValueType::simple(Prim::Double))
            }
            Expr::Str(value) => {
                let index = self.consts.intern(value);
                code.write_op(Op::Ldc)?;
                code.write(u64::from(index))?;
                Ok(ValueType::string())
            }
            Expr::Ident(name) => self.compile_ident(name, code),
            Expr::Assign { target, value } => self.compile_assign(target, value, code),
            Expr::Call { name, args } => self.compile_call(name, args, code),
            Expr::Binary { op, lhs, rhs } => self.compile_binary(*op, lhs, rhs, code),
            Expr::Unary { op, operand } => self.compile_unary(*op, operand, code),
        }
    }

    fn compile_ident(&mut self, name: &str, code: &mut CodeBuf) -> Result<ValueType, CompileError> {
        match lookup_symbol(self.program, self.scope, name) {
            Some(SymbolRef::Local(local)) => {
                let (slot, ty) = (local.slot, local.ty.clone());
                code.write_op(Op::Load)?;
                code.write(u64::from(slot))?;
                Ok(ty)
            }
            Some(SymbolRef::Global(global)) => {
                let (slot, ty) = (global.slot, global.ty.clone());
                code.write_op(Op::GLoad)?;
                code.write(u64::from(slot))?;
                Ok(ty)
            }
            Some(SymbolRef::Function(sig)) => {
                let index = sig.index;
                code.write_op(Op::Push)?;
                code.write(u64::from(index))?;
                Ok(ValueType::void_ptr())
            }
            None => Err(CompileError::UnknownSymbol {
                name: name.to_owned(),
            }),
        }
    }

    fn compile_assign(
        &mut self,
        target: &str,
        value: &Expr,
        code: &mut CodeBuf,
    ) -> Result<ValueType, CompileError> {
        let found = self.compile_expr(value, code)?;
        let (op, slot, expected) = match lookup_symbol(self.program, self.scope, target) {
            Some(SymbolRef::Local(local)) => (Op::Store, local.slot, local.ty.clone()),
            Some(SymbolRef::Global(global)) => (Op::GStore, global.slot, global.ty.clone()),
            Some(SymbolRef::Function(_)) => {
                return Err(CompileError::InvalidAssignTarget {
                    name: target.to_owned(),
                })
            }
            None => {
                return Err(CompileError::UnknownSymbol {
                    name: target.to_owned(),
                })
            }
        };
        if found != expected {
            return Err(CompileError::TypeMismatch { expected, found });
        }
        code.write_op(op)?;
        code.write(u64::from(slot))?;
        Ok(ValueType::simple(Prim::Void))
    }

    fn compile_call(
        &mut self,
        name: &str,
        args: &[Expr],
        code: &mut CodeBuf,
    ) -> Result<ValueType, CompileError> {
        let mut arg_types = Vec::with_capacity(args.len());
        for arg in args {
            arg_types.push(self.compile_expr(arg, code)?);
        }
        let sig = self
            .program
            .resolve_call(name, &arg_types)
            .ok_or_else(|| CompileError::UnknownFunction {
                name: name.to_owned(),
                args: arg_types
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        let (index, return_type) = (sig.index, sig.return_type.clone());
        code.write_op(Op::Invoke)?;
        code.write(u64::from(index))?;
        Ok(return_type)
    }

    fn compile_binary(
        &mut self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        code: &mut CodeBuf,
    ) -> Result<ValueType, CompileError> {
        let lhs_ty = self.compile_expr(lhs, code)?;
        if !lhs_ty.is_numeric() {
            return Err(CompileError::NonNumeric { ty: lhs_ty });
        }
        let mut rhs_code = CodeBuf::new();
        let rhs_ty = self.compile_expr(rhs, &mut rhs_code)?;
        if !rhs_ty.is_numeric() {
            return Err(CompileError::NonNumeric { ty: rhs_ty });
        }

        if lhs_ty.is_double() || rhs_ty.is_double() {
            if !lhs_ty.is_double() {
                if !lhs_ty.is_integer() {
                    return Err(CompileError::NoPromotion { ty: lhs_ty });
                }
                code.write_op(Op::L2d)?;
            }
            code.append(&rhs_code)?;
            if !rhs_ty.is_double() {
                if !rhs_ty.is_integer() {
                    return Err(CompileError::NoPromotion { ty: rhs_ty });
                }
                code.write_op(Op::L2d)?;
            }
            code.write_op(match op {
                BinOp::Add => Op::DAdd,
                BinOp::Sub => Op::DSub,
                BinOp::Mul => Op::DMul,
                BinOp::Div => Op::DDiv,
                BinOp::Rem => Op::DRem,
            })?;
            Ok(ValueType::simple(Prim::Double))
        } else {
            // float cells are 32-bit patterns; the integer opcodes would
            // operate on raw bits
            if lhs_ty.is_float() {
                return Err(CompileError::NoPromotion { ty: lhs_ty });
            }
            if rhs_ty.is_float() {
                return Err(CompileError::NoPromotion { ty: rhs_ty });
            }
            code.append(&rhs_code)?;
            code.write_op(match op {
                BinOp::Add => Op::LAdd,
                BinOp::Sub => Op::LSub,
                BinOp::Mul => Op::LMul,
                BinOp::Div => Op::LDiv,
                BinOp::Rem => Op::LRem,
            })?;
            Ok(ValueType::simple(Prim::Long))
        }
    }

    fn compile_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        code: &mut CodeBuf,
    ) -> Result<ValueType, CompileError> {
        let ty = self.compile_expr(operand, code)?;
        if !ty.is_numeric() {
            return Err(CompileError::NonNumeric { ty });
        }
        match op {
            UnOp::Plus => {}
            UnOp::Neg => code.write_op(Op::LNeg)?,
        }
        Ok(ty)
    }
}

/// Compile one body statement into `code`.
pub fn compile_stmt(
    program: &ProgramScope,
    consts: &mut ConstPool,
    scope: &mut FunctionScope,
    stmt: &Stmt,
    code: &mut CodeBuf,
) -> Result<(), CompileError> {
    match stmt {
        Stmt::Expr(expr) => {
            let mut cx = ExprCx {
                program,
                scope: Some(scope),
                consts,
            };
            let ty = cx.compile_expr(expr, code)?;
            if !ty.is_void() {
                code.write_op(Op::Pop)?;
            }
            Ok(())
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                let mut cx = ExprCx {
                    program,
                    scope: Some(scope),
                    consts,
                };
                cx.compile_expr(value, code)?;
            }
            code.write_op(Op::Return)?;
            Ok(())
        }
        Stmt::Local { name, ty, init } => {
            if ty.is_void() {
                return Err(CompileError::VoidVariable {
                    name: name.clone(),
                });
            }
            // the slot exists before the initializer runs, but the name is
            // bound only after it, so the initializer sees the outer binding
            let slot = scope.alloc_slot();
            if let Some(init) = init {
                let mut cx = ExprCx {
                    program,
                    scope: Some(scope),
                    consts,
                };
                let found = cx.compile_expr(init, code)?;
                if found != *ty {
                    return Err(CompileError::TypeMismatch {
                        expected: ty.clone(),
                        found,
                    });
                }
                code.write_op(Op::Store)?;
                code.write(u64::from(slot))?;
            }
            scope.declare_local(name, ty.clone(), slot)
        }
        Stmt::Asm(word) => {
            code.write(*word)?;
            Ok(())
        }
    }
}
