use crate::token::Token;

/// Identity of an expression node that refers to a variable binding
/// (`Variable`, `Assign`, `This`, `Super`).  The resolver keys its distance
/// table on it.  Ids are handed out by the parser; a session threads the next
/// free id from one parse to the next so its tables never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

/// A **literal constant** that appears directly in the source code.
///
/// The parser copies the value out of the token so the tree does not depend
/// on the token buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    True,

    False,

    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Used to parse literal expressions
    Literal(LiteralValue),

    // Used to parse parenthesized grouped expressions
    Grouping(Box<Expr>),

    // Prefix `!` / `-`
    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    // Arithmetic, comparison and equality operators
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    // Short‑circuiting `and` / `or`
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    // Variable access
    Variable {
        id: ExprId,
        name: Token,
    },

    // `name = value`
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    // Function, method or class call; `paren` is the closing `)` for error lines
    Call {
        callee: Box<Expr>,
        paren: Token,
        arguments: Vec<Expr>,
    },

    // object.property
    Get {
        object: Box<Expr>,
        name: Token,
    },

    // object.property = value
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This {
        id: ExprId,
        keyword: Token,
    },

    // super.method
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(_) => 0,

            Expr::Grouping(expr) => expr.line(),

            Expr::Unary { operator, .. }
            | Expr::Binary { operator, .. }
            | Expr::Logical { operator, .. } => operator.line,

            Expr::Variable { name, .. }
            | Expr::Assign { name, .. }
            | Expr::Get { name, .. }
            | Expr::Set { name, .. } => name.line,

            Expr::Call { paren, .. } => paren.line,

            Expr::This { keyword, .. } | Expr::Super { keyword, .. } => keyword.line,
        }
    }
}
