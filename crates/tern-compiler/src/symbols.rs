//! Symbol scopes for globals, functions, and body locals.
//!
//! The program scope owns file-scope state: global variables, the dense
//! function list, and the per-name overload table. A function scope owns one
//! body's locals plus a copy of the argument slots. Declaration order is
//! semantic in both (overload resolution and slot assignment), so the maps
//! are `IndexMap`s.

use indexmap::IndexMap;

use crate::error::CompileError;
use crate::types::ValueType;

/// A file-scope variable bound to a global slot.
#[derive(Debug, Clone)]
pub struct GlobalVar {
    pub name: String,
    pub ty: ValueType,
    pub slot: u32,
}

/// A body local or argument bound to a frame slot.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub name: String,
    pub ty: ValueType,
    pub slot: u32,
}

/// A registered function signature.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    pub name: String,
    pub return_type: ValueType,
    /// Dense index into the program's function list.
    pub index: u32,
    /// Argument slots in declaration order, starting at 0.
    pub args: IndexMap<String, LocalVar>,
}

impl FunctionSig {
    /// Whether this signature takes exactly the given argument types.
    pub fn matches(&self, arg_types: &[ValueType]) -> bool {
        self.args.len() == arg_types.len()
            && self
                .args
                .values()
                .zip(arg_types)
                .all(|(arg, ty)| arg.ty == *ty)
    }
}

/// What a name resolves to.
#[derive(Debug)]
pub enum SymbolRef<'a> {
    Local(&'a LocalVar),
    Global(&'a GlobalVar),
    Function(&'a FunctionSig),
}

/// File-scope symbol state for one module.
#[derive(Debug, Default)]
pub struct ProgramScope {
    globals: IndexMap<String, GlobalVar>,
    overloads: IndexMap<String, Vec<u32>>,
    functions: Vec<FunctionSig>,
}

impl ProgramScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a global, allocating the next global slot.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicateGlobal`] if the name is taken.
    pub fn declare_global(&mut self, name: &str, ty: ValueType) -> Result<u32, CompileError> {
        if self.globals.contains_key(name) {
            return Err(CompileError::DuplicateGlobal {
                name: name.to_owned(),
            });
        }
        let slot = self.globals.len() as u32;
        self.globals.insert(
            name.to_owned(),
            GlobalVar {
                name: name.to_owned(),
                ty,
                slot,
            },
        );
        Ok(slot)
    }

    /// Register a function signature, assigning it the next dense index.
    ///
    /// Duplicate signatures are accepted; the overload list keeps them in
    /// declaration order and call resolution picks the last match, so a
    /// later duplicate shadows an earlier one.
    pub fn declare_function(
        &mut self,
        name: &str,
        return_type: ValueType,
        args: IndexMap<String, LocalVar>,
    ) -> u32 {
        let index = self.functions.len() as u32;
        self.functions.push(FunctionSig {
            name: name.to_owned(),
            return_type,
            index,
            args,
        });
        self.overloads.entry(name.to_owned()).or_default().push(index);
        index
    }

    pub fn global(&self, name: &str) -> Option<&GlobalVar> {
        self.globals.get(name)
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    pub fn function(&self, index: u32) -> &FunctionSig {
        &self.functions[index as usize]
    }

    pub fn functions(&self) -> &[FunctionSig] {
        &self.functions
    }

    /// The last-declared overload of `name`, regardless of arity.
    pub fn last_overload(&self, name: &str) -> Option<&FunctionSig> {
        let index = *self.overloads.get(name)?.last()?;
        Some(self.function(index))
    }

    /// Resolve a call: scan `name`'s overloads in declaration order and
    /// return the last one whose argument types match exactly.
    pub fn resolve_call(&self, name: &str, arg_types: &[ValueType]) -> Option<&FunctionSig> {
        let indices = self.overloads.get(name)?;
        indices
            .iter()
            .map(|&index| self.function(index))
            .filter(|sig| sig.matches(arg_types))
            .last()
    }
}

/// Body-local symbol state for one function.
#[derive(Debug)]
pub struct FunctionScope {
    /// The function's dense index.
    pub index: u32,
    args: IndexMap<String, LocalVar>,
    locals: IndexMap<String, LocalVar>,
    next_slot: u32,
}

impl FunctionScope {
    /// Open a body scope: argument slots are pre-assigned, body locals
    /// continue after the last argument.
    pub fn for_function(sig: &FunctionSig) -> Self {
        Self {
            index: sig.index,
            args: sig.args.clone(),
            locals: IndexMap::new(),
            next_slot: sig.args.len() as u32,
        }
    }

    /// Reserve the next frame slot without binding a name to it.
    pub fn alloc_slot(&mut self) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    /// Bind `name` to an already-allocated slot.
    ///
    /// A local may shadow an argument; it may not collide with another
    /// local.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicateLocal`] on a local-name collision.
    pub fn declare_local(
        &mut self,
        name: &str,
        ty: ValueType,
        slot: u32,
    ) -> Result<(), CompileError> {
        if self.locals.contains_key(name) {
            return Err(CompileError::DuplicateLocal {
                name: name.to_owned(),
            });
        }
        self.locals.insert(
            name.to_owned(),
            LocalVar {
                name: name.to_owned(),
                ty,
                slot,
            },
        );
        Ok(())
    }

    /// Total frame slots used: arguments plus body locals.
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }

    /// Resolve a name against locals first, then arguments.
    pub fn lookup(&self, name: &str) -> Option<&LocalVar> {
        self.locals.get(name).or_else(|| self.args.get(name))
    }
}

/// Walk the scope chain: body locals, arguments, globals, then the last
/// function overload.
pub fn lookup_symbol<'a>(
    program: &'a ProgramScope,
    scope: Option<&'a FunctionScope>,
    name: &str,
) -> Option<SymbolRef<'a>> {
    if let Some(scope) = scope {
        if let Some(local) = scope.lookup(name) {
            return Some(SymbolRef::Local(local));
        }
    }
    if let Some(global) = program.global(name) {
        return Some(SymbolRef::Global(global));
    }
    program.last_overload(name).map(SymbolRef::Function)
}
