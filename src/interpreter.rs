use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::callable::{self, Callable};
use crate::class::{Class, Instance, INITIALIZER};
use crate::environment::{EnvRef, Environment};
use crate::error::{Diagnostics, FojError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::function::Function;
use crate::resolver::Resolutions;
use crate::stack::ensure_sufficient_stack;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  `return` travels up as `Flow::Return` until the
/// enclosing function call consumes it; errors travel separately as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Deepest chain of nested calls before the program is stopped with
/// "Stack overflow.".
pub const MAX_CALL_DEPTH: usize = 1000;

/// Tree‑walking evaluator.
pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: Resolutions,
    output: Box<dyn Write>,

    /// Print the value of top‑level expression statements (prompt mode).
    echo: bool,

    /// Calls currently in progress.
    call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new Interpreter printing to stdout, with native functions
    /// such as `clock` defined.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Same as [`Interpreter::new`] but `print` writes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Environment::new().into_ref();

        debug!("Defining native function 'clock'");

        globals
            .borrow_mut()
            .define("clock", Value::Native(Rc::new(callable::clock())));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
            echo: false,
            call_depth: 0,
        }
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Names currently bound in the global scope.
    pub fn global_names(&self) -> Vec<String> {
        self.globals.borrow().names()
    }

    /// Merge a resolver's table into the one used for lookups.
    pub fn note_locals(&mut self, resolutions: Resolutions) {
        self.locals.extend(resolutions);
    }

    /// Drop entries that no code left to run can refer to.
    pub fn forget_locals(&mut self, ids: &[ExprId]) {
        for id in ids {
            self.locals.remove(id);
        }
    }

    /// Number of resolved local references currently held.
    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Interprets a list of statements (a "program").  Stops at the first
    /// runtime error, which is reported to `diagnostics`.  Returns how many
    /// top‑level statements completed.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) -> usize {
        debug!("Interpreting {} statements", statements.len());

        let mut executed: usize = 0;

        for stmt in statements {
            let outcome: Result<()> = match stmt {
                Stmt::Expression(expr) if self.echo => self.echo_expression(expr),
                _ => self.execute(stmt).map(|_| ()),
            };

            match outcome {
                Ok(()) => executed += 1,
                Err(err) => {
                    diagnostics.report(err);
                    break;
                }
            }
        }

        if let Err(e) = self.output.flush() {
            warn!("Failed to flush program output: {}", e);
        }

        info!("Executed {} of {} statements", executed, statements.len());

        executed
    }

    fn echo_expression(&mut self, expr: &Expr) -> Result<()> {
        let value: Value = self.evaluate(expr)?;
        writeln!(self.output, "{}", value)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, scope.into_ref())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let superclass: Option<Rc<Class>> = match superclass {
                    Some(expr) => match self.evaluate(expr)? {
                        Value::Class(class) => Some(class),
                        _ => {
                            return Err(FojError::runtime(
                                expr.line(),
                                "Superclass must be a class.",
                            ))
                        }
                    },
                    None => None,
                };

                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Null);

                // Methods close over a scope holding `super`, when there is one.
                let method_scope: EnvRef = match &superclass {
                    Some(class) => {
                        let mut scope = Environment::with_enclosing(Rc::clone(&self.environment));
                        scope.define("super", Value::Class(Rc::clone(class)));
                        scope.into_ref()
                    }
                    None => Rc::clone(&self.environment),
                };

                let methods: HashMap<String, Rc<Function>> = methods
                    .iter()
                    .map(|method| {
                        let function = Function::new(
                            Rc::clone(method),
                            Rc::clone(&method_scope),
                            method.name.lexeme == INITIALIZER,
                        );
                        (method.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = Class::new(name.lexeme.clone(), superclass, methods);

                info!("Class '{}' defined", name.lexeme);

                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` inside `environment`, restoring the previous scope
    /// afterwards whatever the outcome.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> Result<Flow> {
        let previous: EnvRef = std::mem::replace(&mut self.environment, environment);

        let mut result: Result<Flow> = Ok(Flow::Normal);

        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;

        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Null => Value::Null,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val: Value = self.evaluate(left)?;

                let short_circuit: bool = match operator.token_type {
                    TokenType::OR => left_val.is_truthy(),
                    _ => !left_val.is_truthy(),
                };

                if short_circuit {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &name.lexeme,
                        value.clone(),
                    ),
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val: Value = self.evaluate(callee)?;

                let mut arg_values: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    arg_values.push(self.evaluate(arg)?);
                }

                self.invoke_callable(&callee_val, paren, arg_values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Instance::get(&instance, name),
                _ => Err(FojError::runtime(
                    name.line,
                    "Only instances have properties.",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value: Value = self.evaluate(value)?;
                    instance.borrow_mut().set(name, value.clone());
                    Ok(value)
                }
                _ => Err(FojError::runtime(name.line, "Only instances have fields.")),
            },

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    /// Evaluates a unary expression.
    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::BANG => Ok(Value::Bool(!right_val.is_truthy())),

            TokenType::MINUS => match right_val {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(FojError::runtime(
                    operator.line,
                    format!("Operand of '{}' must be a number.", operator.lexeme),
                )),
            },

            _ => Err(FojError::runtime(
                operator.line,
                format!("Invalid unary operator '{}'.", operator.lexeme),
            )),
        }
    }

    /// Evaluates a binary expression.
    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;

        debug!(
            "Binary '{}' on {:?} and {:?}",
            operator.lexeme, left_val, right_val
        );

        match operator.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left_val == right_val)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left_val != right_val)),
            TokenType::PLUS => return plus(operator, left_val, right_val),
            _ => {}
        }

        let (a, b): (f64, f64) = match (&left_val, &right_val) {
            (Value::Number(a), Value::Number(b)) => (*a, *b),
            _ => {
                return Err(FojError::runtime(
                    operator.line,
                    format!("Operands of '{}' must be numbers.", operator.lexeme),
                ))
            }
        };

        let value: Value = match operator.token_type {
            TokenType::MINUS => Value::Number(a - b),
            TokenType::STAR => Value::Number(a * b),
            // IEEE rules: 1 / 0 is Infinity, 0 / 0 is NaN.
            TokenType::SLASH => Value::Number(a / b),
            TokenType::GREATER => Value::Bool(a > b),
            TokenType::GREATER_EQUAL => Value::Bool(a >= b),
            TokenType::LESS => Value::Bool(a < b),
            TokenType::LESS_EQUAL => Value::Bool(a <= b),
            _ => {
                return Err(FojError::runtime(
                    operator.line,
                    format!("Invalid binary operator '{}'.", operator.lexeme),
                ))
            }
        };

        Ok(value)
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance: usize = match self.locals.get(&id) {
            Some(&distance) => distance,
            None => {
                return Err(FojError::runtime(
                    keyword.line,
                    "Can't use 'super' outside of a class.",
                ))
            }
        };

        let superclass: Value = Environment::get_at(&self.environment, distance, "super");

        // `this` is always bound one scope inside the one holding `super`.
        let object: Value =
            Environment::get_at(&self.environment, distance.saturating_sub(1), "this");

        match (superclass, object) {
            (Value::Class(class), Value::Instance(instance)) => {
                match class.find_method(&method.lexeme) {
                    Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
                    None => Err(FojError::runtime(
                        method.line,
                        format!("Undefined property '{}'.", method.lexeme),
                    )),
                }
            }
            _ => Err(FojError::runtime(
                keyword.line,
                "Can't use 'super' outside of a method.",
            )),
        }
    }

    /// Resolved locals are read at their distance; everything else is a global.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Ok(Environment::get_at(
                &self.environment,
                distance,
                &name.lexeme,
            )),
            None => self.globals.borrow().get(name),
        }
    }

    /// Invokes a callable (native function, user function or class).
    fn invoke_callable(
        &mut self,
        callee_val: &Value,
        paren: &Token,
        arg_values: Vec<Value>,
    ) -> Result<Value> {
        let callable: &dyn Callable = match callee_val.as_callable() {
            Some(callable) => callable,
            None => {
                return Err(FojError::runtime(
                    paren.line,
                    "Can only call functions and classes.",
                ))
            }
        };

        if arg_values.len() != callable.arity() {
            return Err(FojError::runtime(
                paren.line,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arg_values.len()
                ),
            ));
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            warn!("Call depth limit of {} reached", MAX_CALL_DEPTH);
            return Err(FojError::runtime(paren.line, "Stack overflow."));
        }

        debug!("Calling {} with {} arguments", callee_val, arg_values.len());

        self.call_depth += 1;
        let result: Result<Value> = ensure_sufficient_stack(|| callable.call(self, arg_values));
        self.call_depth -= 1;

        result.map_err(|err| err.or_line(paren.line))
    }
}

/// `+`: numeric addition, or concatenation when either side is a string.
fn plus(operator: &Token, left: Value, right: Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

        (left @ Value::String(_), right) | (left, right @ Value::String(_)) => {
            Ok(Value::String(format!("{}{}", left, right)))
        }

        (left, right) => Err(FojError::runtime(
            operator.line,
            format!(
                "Operands of '{}' must be two numbers or at least one string, got {} and {}.",
                operator.lexeme,
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}
