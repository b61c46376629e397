//! Parse-tree values
//!
//! Every successful parse step produces an [`Expression`]. The engine itself only builds three
//! shapes:
//!
//! - [`Expression::Terminal`] wraps a single token,
//! - [`Expression::Pair`] joins two expressions, and
//! - [`Expression::Nothing`] terminates a list.
//!
//! Sequences are encoded the way a cons-list is: `Pair(a, Pair(b, Pair(c, Nothing)))` is the
//! list `[a, b, c]`, and [`Expression::as_list`] recovers it.
//!
//! Grammars that want their own tree types implement [`Production`] and wrap their values in
//! [`Expression::Other`], usually from inside
//! [`ParserFunction::map_expression`](super::ParserFunction::map_expression).

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde_json::Value;

use crate::lexer::{Token, TokenKind};

/// Capabilities a grammar-specific expression type provides to the engine.
pub trait Production<K>: fmt::Debug + fmt::Display {
    /// The list view of this production, if it has one. Productions that return `None` are
    /// treated as a one-element list containing themselves.
    fn as_list(&self) -> Option<Vec<Expression<K>>> {
        None
    }

    fn to_json(&self) -> Value;

    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another production of any type.
    fn equals(&self, other: &dyn Production<K>) -> bool;
}

/// Equality helper for [`Production::equals`] implementations: true iff `other` has the same
/// concrete type as `this` and compares equal to it.
pub fn same_production<K, T>(this: &T, other: &dyn Production<K>) -> bool
where
    T: PartialEq + 'static,
{
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| other == this)
}

#[derive(Debug, Clone)]
pub enum Expression<K> {
    Terminal(Token<K>),
    Pair(Rc<Expression<K>>, Rc<Expression<K>>),
    Nothing,
    Other(Rc<dyn Production<K>>),
}

impl<K: TokenKind> Expression<K> {
    pub fn terminal(token: Token<K>) -> Self {
        Expression::Terminal(token)
    }

    pub fn pair(left: Expression<K>, right: Expression<K>) -> Self {
        Expression::Pair(Rc::new(left), Rc::new(right))
    }

    pub fn nothing() -> Self {
        Expression::Nothing
    }

    pub fn other(production: impl Production<K> + 'static) -> Self {
        Expression::Other(Rc::new(production))
    }

    /// Fixed-arity form of [`Expression::list`].
    ///
    /// # Panics
    ///
    /// Panics when `N` is zero.
    pub fn sequence<const N: usize>(exprs: [Expression<K>; N]) -> Self {
        Self::list(exprs)
    }

    /// Right-nests the given expressions into a `Nothing`-terminated pair chain, so that
    /// `Expression::list(xs).as_list() == xs`.
    ///
    /// # Panics
    ///
    /// Panics when `exprs` is empty. No combinator ever asks for an empty chain, so an empty
    /// input means the calling grammar code is broken.
    pub fn list(exprs: impl IntoIterator<Item = Expression<K>>) -> Self {
        let exprs: Vec<_> = exprs.into_iter().collect();
        if exprs.is_empty() {
            panic!("internal error: Expression::list requires at least one expression");
        }
        Self::chain(exprs)
    }

    /// Like [`Expression::list`], but an empty input yields `Nothing`.
    pub(crate) fn chain(exprs: Vec<Expression<K>>) -> Self {
        exprs
            .into_iter()
            .rev()
            .fold(Expression::Nothing, |tail, head| Expression::pair(head, tail))
    }

    /// The list view of this expression.
    ///
    /// A pair contributes its left side and then the list view of its right side, `Nothing`
    /// is the empty list, and anything else is a one-element list (unless an `Other`
    /// production supplies its own view).
    pub fn as_list(&self) -> Vec<Expression<K>> {
        let mut items = Vec::new();
        let mut current = self;
        loop {
            match current {
                Expression::Pair(left, right) => {
                    items.push(left.as_ref().clone());
                    current = right.as_ref();
                }
                Expression::Nothing => break,
                Expression::Terminal(_) => {
                    items.push(current.clone());
                    break;
                }
                Expression::Other(production) => {
                    match production.as_list() {
                        Some(rest) => items.extend(rest),
                        None => items.push(current.clone()),
                    }
                    break;
                }
            }
        }
        items
    }

    /// Four-way dispatch on the variant, calling exactly one of the handlers.
    pub fn match_with<R>(
        &self,
        on_terminal: impl FnOnce(&Token<K>) -> R,
        on_nothing: impl FnOnce() -> R,
        on_pair: impl FnOnce(&Expression<K>, &Expression<K>) -> R,
        on_other: impl FnOnce(&dyn Production<K>) -> R,
    ) -> R {
        match self {
            Expression::Terminal(token) => on_terminal(token),
            Expression::Nothing => on_nothing(),
            Expression::Pair(left, right) => on_pair(left.as_ref(), right.as_ref()),
            Expression::Other(production) => on_other(production.as_ref()),
        }
    }

    pub fn as_terminal(&self) -> Option<&Token<K>> {
        match self {
            Expression::Terminal(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Expression<K>, &Expression<K>)> {
        match self {
            Expression::Pair(left, right) => Some((left.as_ref(), right.as_ref())),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Expression::Nothing)
    }

    /// The grammar-specific value inside an `Other` expression, if it has type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Expression::Other(production) => production.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Expression::Terminal(token) => token.to_json(),
            Expression::Pair(_, _) => {
                Value::Array(self.as_list().iter().map(Expression::to_json).collect())
            }
            Expression::Nothing => Value::String("∅".to_string()),
            Expression::Other(production) => production.to_json(),
        }
    }
}

impl<K> Drop for Expression<K> {
    /// Unlinks the right spine of a pair chain one link at a time, so dropping a long list
    /// does not recurse once per element.
    fn drop(&mut self) {
        let mut spine = match self {
            Expression::Pair(_, right) => take_unique_pair(right),
            _ => None,
        };
        while let Some(link) = spine {
            spine = match Rc::try_unwrap(link) {
                Ok(mut expr) => match &mut expr {
                    Expression::Pair(_, right) => take_unique_pair(right),
                    _ => None,
                },
                Err(_) => None,
            };
        }
    }
}

/// Detaches `slot` when it is a pair that nothing else references.
fn take_unique_pair<K>(slot: &mut Rc<Expression<K>>) -> Option<Rc<Expression<K>>> {
    let unique_pair = matches!(Rc::get_mut(slot), Some(Expression::Pair(_, _)));
    if unique_pair {
        Some(std::mem::replace(slot, Rc::new(Expression::Nothing)))
    } else {
        None
    }
}

impl<K: PartialEq> PartialEq for Expression<K> {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (a, b) {
                (Expression::Pair(a_left, a_right), Expression::Pair(b_left, b_right)) => {
                    if a_left != b_left {
                        return false;
                    }
                    a = a_right.as_ref();
                    b = b_right.as_ref();
                }
                (Expression::Terminal(x), Expression::Terminal(y)) => return x == y,
                (Expression::Nothing, Expression::Nothing) => return true,
                (Expression::Other(x), Expression::Other(y)) => return x.equals(y.as_ref()),
                _ => return false,
            }
        }
    }
}

impl<K: Eq> Eq for Expression<K> {}

impl<K: Hash> Hash for Expression<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut current = self;
        loop {
            std::mem::discriminant(current).hash(state);
            match current {
                Expression::Pair(left, right) => {
                    left.hash(state);
                    current = right.as_ref();
                }
                Expression::Terminal(token) => return token.hash(state),
                Expression::Nothing => return,
                // equal productions render to equal JSON
                Expression::Other(production) => {
                    return production.to_json().to_string().hash(state);
                }
            }
        }
    }
}

impl<K: TokenKind> fmt::Display for Expression<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = self;
        let mut open = 0;
        loop {
            match current {
                Expression::Pair(left, right) => {
                    write!(f, "Pair({left}, ")?;
                    open += 1;
                    current = right.as_ref();
                }
                Expression::Terminal(token) => break write!(f, "Terminal{token}")?,
                Expression::Nothing => break f.write_str("∅")?,
                Expression::Other(production) => break write!(f, "{production}")?,
            }
        }
        for _ in 0..open {
            f.write_str(")")?;
        }
        Ok(())
    }
}
