use crate::ir::err::IrError;
use crate::ir::op::IROp;
use crate::ir::value::{FuncId, GlobalId, IrType, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: IrType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: IrType,
    pub variadic: bool,
    pub external: bool,
    /// `None` until the function has been finalized by a builder, and
    /// always `None` for externals.
    pub body: Option<Vec<IROp>>,
    /// Result type of each instruction in `body`, by position.
    pub types: Vec<IrType>,
}

impl Function {
    pub fn is_defined(&self) -> bool {
        self.body.is_some()
    }

    pub fn ops(&self) -> &[IROp] {
        self.body.as_deref().unwrap_or(&[])
    }
}

/// Compilation unit: owns every declared function and string global.
#[derive(Debug, Clone)]
pub struct IrModule {
    pub name: String,
    functions: Vec<Function>,
    by_name: HashMap<String, FuncId>,
    globals: Vec<String>,
}

impl IrModule {
    pub fn new(name: &str) -> Self {
        IrModule {
            name: name.to_string(),
            functions: Vec::new(),
            by_name: HashMap::new(),
            globals: Vec::new(),
        }
    }

    fn insert(&mut self, function: Function) -> Result<FuncId, IrError> {
        if self.by_name.contains_key(&function.name) {
            return Err(IrError::DuplicateFunction { name: function.name });
        }
        for p in &function.params {
            if !matches!(p.ty, IrType::Int | IrType::Ptr) {
                return Err(IrError::InvalidType { context: format!("parameter '{}' of '{}'", p.name, function.name), ty: p.ty });
            }
        }
        if !matches!(function.ret, IrType::Int | IrType::Void) {
            return Err(IrError::InvalidType { context: format!("return of '{}'", function.name), ty: function.ret });
        }
        let id = self.functions.len();
        self.by_name.insert(function.name.clone(), id);
        self.functions.push(function);
        Ok(id)
    }

    /// Declare a function that will be given a body by a `FunctionBuilder`.
    pub fn declare_function(&mut self, name: &str, params: Vec<Param>, ret: IrType) -> Result<FuncId, IrError> {
        self.insert(Function {
            name: name.to_string(),
            params,
            ret,
            variadic: false,
            external: false,
            body: None,
            types: Vec::new(),
        })
    }

    /// Declare a routine provided by the runtime (e.g. the print routine).
    pub fn declare_external(
        &mut self,
        name: &str,
        params: Vec<Param>,
        variadic: bool,
        ret: IrType,
    ) -> Result<FuncId, IrError> {
        self.insert(Function {
            name: name.to_string(),
            params,
            ret,
            variadic,
            external: true,
            body: None,
            types: Vec::new(),
        })
    }

    pub(crate) fn define_function(&mut self, id: FuncId, body: Vec<IROp>, types: Vec<IrType>) -> Result<(), IrError> {
        let function = self.functions.get_mut(id).ok_or(IrError::UnknownValue { value: Value::Func(id) })?;
        if function.external || function.body.is_some() {
            return Err(IrError::DuplicateFunction { name: function.name.clone() });
        }
        function.body = Some(body);
        function.types = types;
        Ok(())
    }

    pub fn find_function(&self, name: &str) -> Option<FuncId> {
        self.by_name.get(name).copied()
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.find_function(name).and_then(|id| self.function(id))
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Intern a string constant, reusing an existing global with the same
    /// contents.
    pub fn intern_string(&mut self, contents: &str) -> GlobalId {
        if let Some(idx) = self.globals.iter().position(|g| g == contents) {
            return idx;
        }
        self.globals.push(contents.to_string());
        self.globals.len() - 1
    }

    pub fn global(&self, id: GlobalId) -> Option<&str> {
        self.globals.get(id).map(String::as_str)
    }

    fn fmt_value(&self, value: &Value) -> String {
        match value {
            Value::Func(id) => match self.function(*id) {
                Some(func) => format!("@{}", func.name),
                None => value.to_string(),
            },
            other => other.to_string(),
        }
    }

    fn fmt_op(&self, op: &IROp) -> String {
        match op {
            IROp::Alloca { name } => format!("alloca i64 ; {}", name),
            IROp::Load { ptr } => format!("load {}", self.fmt_value(ptr)),
            IROp::Store { ptr, value } => format!("store {}, {}", self.fmt_value(value), self.fmt_value(ptr)),
            IROp::Binary { op, lhs, rhs } => {
                format!("{} {}, {}", op.mnemonic(), self.fmt_value(lhs), self.fmt_value(rhs))
            }
            IROp::Call { callee, args } => {
                let args = args.iter().map(|a| self.fmt_value(a)).collect::<Vec<_>>().join(", ");
                format!("call {}({})", self.fmt_value(&Value::Func(*callee)), args)
            }
            IROp::Ret { value: Some(v) } => format!("ret {}", self.fmt_value(v)),
            IROp::Ret { value: None } => "ret void".to_string(),
        }
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for (i, g) in self.globals.iter().enumerate() {
            writeln!(f, "{} = {:?}", Value::Global(i), g)?;
        }
        for func in &self.functions {
            let mut params = func
                .params
                .iter()
                .map(|p| format!("{} %{}", p.ty, p.name))
                .collect::<Vec<_>>();
            if func.variadic {
                params.push("...".to_string());
            }
            let head = format!("{} @{}({})", func.ret, func.name, params.join(", "));
            match &func.body {
                None => writeln!(f, "declare {}", head)?,
                Some(ops) => {
                    writeln!(f, "define {} {{", head)?;
                    for (i, op) in ops.iter().enumerate() {
                        let produces = func.types.get(i).is_some_and(|t| *t != IrType::Void);
                        if produces {
                            writeln!(f, "  %{} = {}", i, self.fmt_op(op))?;
                        } else {
                            writeln!(f, "  {}", self.fmt_op(op))?;
                        }
                    }
                    writeln!(f, "}}")?;
                }
            }
        }
        Ok(())
    }
}
