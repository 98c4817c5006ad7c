use std::fmt;

use crate::math::C;
use crate::parser::{parse, BinOp, Expr, ParseError, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnknownFunction(String),
    WrongArity { name: String, expected: usize, got: usize },
    UnknownIdentifier(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnknownFunction(name) => write!(f, "unknown function \"{}\"", name),
            EvalError::WrongArity { name, expected, got } => {
                write!(f, "{}() takes {} argument(s), got {}", name, expected, got)
            }
            EvalError::UnknownIdentifier(name) => {
                write!(f, "unknown identifier \"{}\"", name)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// A parsed expression bound to the name of its single free variable.
/// Stateless: one `CompiledExpr` serves hundreds of thousands of grid
/// evaluations, and it can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    root: Expr,
    var: String,
}

/// Per-evaluation binding. The reserved constants resolve regardless of
/// the free-variable name.
struct Scope<'a> {
    var: &'a str,
    value: C,
}

impl Scope<'_> {
    fn lookup(&self, name: &str) -> Option<C> {
        match name {
            "i" => Some(C::i()),
            "pi" => Some(C::pi()),
            "e" => Some(C::e()),
            _ if name == self.var => Some(self.value),
            _ => None,
        }
    }
}

pub fn compile(root: Expr, var: &str) -> CompiledExpr {
    CompiledExpr { root, var: var.to_string() }
}

/// Parse and compile in one step.
pub fn compile_str(text: &str, var: &str) -> Result<CompiledExpr, ParseError> {
    Ok(compile(parse(text)?, var))
}

impl CompiledExpr {
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Evaluate against a binding of the free variable. Numeric edge cases
    /// (division by zero, overflow, log of zero) never error; they resolve
    /// to non-finite values that propagate. Errors are reserved for unknown
    /// names and wrong arity.
    pub fn eval(&self, value: C) -> Result<C, EvalError> {
        let scope = Scope { var: &self.var, value };
        eval_node(&self.root, &scope)
    }

    /// Evaluation for batch generators: errors collapse into the invalid
    /// marker so a bad sample is handled like any other non-finite result.
    pub fn eval_or_nan(&self, value: C) -> C {
        self.eval(value).unwrap_or_else(|_| C::nan())
    }
}

fn eval_node(node: &Expr, scope: &Scope) -> Result<C, EvalError> {
    match node {
        Expr::Num(value) => Ok(C::new(*value, 0.0)),
        Expr::Const(name) | Expr::Var(name) => scope
            .lookup(name)
            .ok_or_else(|| EvalError::UnknownIdentifier(name.clone())),
        Expr::Unary(UnaryOp::Neg, operand) => Ok(eval_node(operand, scope)?.neg()),
        Expr::Binary(op, lhs, rhs) => {
            let a = eval_node(lhs, scope)?;
            let b = eval_node(rhs, scope)?;
            Ok(match op {
                BinOp::Add => a.add(b),
                BinOp::Sub => a.sub(b),
                BinOp::Mul => a.mul(b),
                BinOp::Div => a.div(b),
                BinOp::Pow => a.powc(b),
            })
        }
        Expr::Call(name, args) => {
            if args.len() != 1 {
                if !is_known_function(name) {
                    return Err(EvalError::UnknownFunction(name.clone()));
                }
                return Err(EvalError::WrongArity {
                    name: name.clone(),
                    expected: 1,
                    got: args.len(),
                });
            }
            let arg = eval_node(&args[0], scope)?;
            apply_function(name, arg)
        }
    }
}

fn is_known_function(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "sinh" | "cosh" | "tanh" | "exp" | "log" | "ln"
            | "sqrt" | "abs" | "arg" | "re" | "im" | "conj"
    )
}

fn apply_function(name: &str, z: C) -> Result<C, EvalError> {
    let value = match name {
        "sin" => z.sin(),
        "cos" => z.cos(),
        "tan" => z.tan(),
        "sinh" => z.sinh(),
        "cosh" => z.cosh(),
        "tanh" => z.tanh(),
        "exp" => z.exp(),
        "log" | "ln" => z.ln(),
        "sqrt" => z.sqrt(),
        "abs" => C::new(z.abs(), 0.0),
        "arg" => C::new(z.arg(), 0.0),
        "re" => C::new(z.re, 0.0),
        "im" => C::new(z.im, 0.0),
        "conj" => z.conj(),
        _ => return Err(EvalError::UnknownFunction(name.to_string())),
    };
    Ok(value)
}
