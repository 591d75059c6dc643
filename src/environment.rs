use crate::error::{FojError, Result};
use crate::token::Token;
use crate::value::Value;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.  Closures and child scopes keep it alive.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: name → value, plus a link to the enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Names bound directly in this scope.
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Bind `name` in this scope, overwriting any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("Defining '{}' = {:?}", name, value);

        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Reassign an existing binding, searching outward.  Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Walk exactly `distance` enclosing links from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
        let mut current: EnvRef = Rc::clone(env);

        for hop in 0..distance {
            let next: Option<EnvRef> = current.borrow().enclosing.clone();

            match next {
                Some(next) => current = next,
                None => {
                    warn!("Scope chain ended after {} of {} hops", hop, distance);
                    break;
                }
            }
        }

        current
    }

    /// Read `name` from the scope `distance` hops out.
    pub fn get_at(env: &EnvRef, distance: usize, name: &str) -> Value {
        let scope: EnvRef = Self::ancestor(env, distance);
        let value: Option<Value> = scope.borrow().values.get(name).cloned();

        value.unwrap_or(Value::Null)
    }

    /// Write `name` in the scope `distance` hops out.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &str, value: Value) {
        Self::ancestor(env, distance)
            .borrow_mut()
            .define(name, value);
    }
}

fn undefined(name: &Token) -> FojError {
    FojError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::synthetic(name, 1)
    }

    #[test]
    fn define_overwrites_in_same_scope() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));
        env.define("a", Value::Number(2.0));

        assert_eq!(env.get(&ident("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn lookup_walks_outward() {
        let global = Environment::new().into_ref();
        global.borrow_mut().define("a", Value::Bool(true));

        let local = Environment::with_enclosing(Rc::clone(&global));

        assert_eq!(local.get(&ident("a")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn assign_updates_the_declaring_scope() {
        let global = Environment::new().into_ref();
        global.borrow_mut().define("a", Value::Number(1.0));

        let mut local = Environment::with_enclosing(Rc::clone(&global));
        local.assign(&ident("a"), Value::Number(5.0)).unwrap();

        assert_eq!(global.borrow().get(&ident("a")).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::new();
        let err = env.assign(&ident("ghost"), Value::Null).unwrap_err();

        assert_eq!(err.to_string(), "Undefined variable 'ghost'.\n[line 1]");
        assert!(env.get(&ident("ghost")).is_err());
    }

    #[test]
    fn distance_access_skips_shadowing_scopes() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("x", Value::String("outer".into()));

        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        inner.borrow_mut().define("x", Value::String("inner".into()));

        assert_eq!(Environment::get_at(&inner, 0, "x"), Value::String("inner".into()));
        assert_eq!(Environment::get_at(&inner, 1, "x"), Value::String("outer".into()));

        Environment::assign_at(&inner, 1, "x", Value::Number(3.0));
        assert_eq!(Environment::get_at(&outer, 0, "x"), Value::Number(3.0));
        assert_eq!(Environment::get_at(&inner, 0, "x"), Value::String("inner".into()));
    }

    #[test]
    fn shared_scope_sees_mutations_through_every_handle() {
        let scope = Environment::new().into_ref();
        scope.borrow_mut().define("n", Value::Number(0.0));

        let first = Environment::with_enclosing(Rc::clone(&scope)).into_ref();
        let second = Environment::with_enclosing(Rc::clone(&scope)).into_ref();

        Environment::assign_at(&first, 1, "n", Value::Number(1.0));

        assert_eq!(Environment::get_at(&second, 1, "n"), Value::Number(1.0));
    }
}
