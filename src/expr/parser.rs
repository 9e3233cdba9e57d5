//! Recursive-descent parser producing the expression tree.
//!
//! Precedence, loosest first: `||`, `&&`, equality, ordering, additive,
//! multiplicative, unary. Binary operators associate to the left.

use super::lexer::{tokenize, Token, TokenKind};
use super::ExprError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    /// `has(key)`: the resource is present.
    Has,
    /// `len(value)`: length of a string, array or object.
    Len,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "has" => Some(Self::Has),
            "len" => Some(Self::Len),
            _ => None,
        }
    }

    fn arity(self) -> usize {
        match self {
            Self::Has | Self::Len => 1,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Has => "has",
            Self::Len => "len",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Literal(Value),
    Var(String),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
}

/// Deepest expression tree, and deepest parser recursion, accepted.
pub(crate) const MAX_DEPTH: usize = 256;

pub(crate) fn parse(input: &str) -> Result<Node, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };

    if parser.peek().kind == TokenKind::Eof {
        return Err(ExprError::new(0, "empty expression"));
    }
    let (node, _) = parser.or()?;
    let rest = parser.peek();
    if rest.kind != TokenKind::Eof {
        return Err(ExprError::new(
            rest.offset,
            format!("unexpected '{}' after expression", rest.kind.describe()),
        ));
    }
    Ok(node)
}

/// A parsed subtree and its height.
type Parsed = Result<(Node, usize), ExprError>;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Open parentheses, unary operators and calls on the current path.
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always ends with Eof, and advance never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.eat(&kind) {
            return Ok(());
        }
        let found = self.peek();
        Err(ExprError::new(
            found.offset,
            format!("expected '{}', found '{}'", kind.describe(), found.kind.describe()),
        ))
    }

    fn too_deep(offset: usize) -> ExprError {
        ExprError::new(offset, format!("expression nests deeper than {MAX_DEPTH} levels"))
    }

    /// Enter a recursive construct starting at `offset`.
    fn descend(&mut self, offset: usize) -> Result<(), ExprError> {
        if self.nesting >= MAX_DEPTH {
            return Err(Self::too_deep(offset));
        }
        self.nesting += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    /// Height of a node over children of height `child`.
    fn grow(child: usize, offset: usize) -> Result<usize, ExprError> {
        let height = child + 1;
        if height > MAX_DEPTH {
            return Err(Self::too_deep(offset));
        }
        Ok(height)
    }

    fn or(&mut self) -> Parsed {
        let (mut left, mut height) = self.and()?;
        while self.peek().kind == TokenKind::Or {
            let offset = self.advance().offset;
            let (right, right_height) = self.and()?;
            height = Self::grow(height.max(right_height), offset)?;
            left = Node::Or(Box::new(left), Box::new(right));
        }
        Ok((left, height))
    }

    fn and(&mut self) -> Parsed {
        let (mut left, mut height) = self.equality()?;
        while self.peek().kind == TokenKind::And {
            let offset = self.advance().offset;
            let (right, right_height) = self.equality()?;
            height = Self::grow(height.max(right_height), offset)?;
            left = Node::And(Box::new(left), Box::new(right));
        }
        Ok((left, height))
    }

    fn equality(&mut self) -> Parsed {
        self.binary(Self::comparison, |kind| match kind {
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::Ne => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Parsed {
        self.binary(Self::additive, |kind| match kind {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn additive(&mut self) -> Parsed {
        self.binary(Self::multiplicative, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> Parsed {
        self.binary(Self::unary, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    fn binary(
        &mut self,
        operand: fn(&mut Self) -> Parsed,
        operator: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Parsed {
        let (mut left, mut height) = operand(self)?;
        while let Some(op) = operator(&self.peek().kind) {
            let offset = self.advance().offset;
            let (right, right_height) = operand(self)?;
            height = Self::grow(height.max(right_height), offset)?;
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }
        Ok((left, height))
    }

    fn unary(&mut self) -> Parsed {
        let op = match self.peek().kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.primary(),
        };
        let offset = self.advance().offset;
        self.descend(offset)?;
        let (operand, height) = self.unary()?;
        self.ascend();
        Ok((Node::Unary(op, Box::new(operand)), Self::grow(height, offset)?))
    }

    fn primary(&mut self) -> Parsed {
        let token = self.advance();
        let node = match token.kind {
            TokenKind::Int(n) => Node::Literal(Value::from(n)),
            TokenKind::Float(x) => Node::Literal(Value::from(x)),
            TokenKind::Str(s) => Node::Literal(Value::String(s)),
            TokenKind::True => Node::Literal(Value::Bool(true)),
            TokenKind::False => Node::Literal(Value::Bool(false)),
            TokenKind::Nil => Node::Literal(Value::Null),
            TokenKind::LParen => {
                self.descend(token.offset)?;
                let inner = self.or()?;
                self.expect(TokenKind::RParen)?;
                self.ascend();
                return Ok(inner);
            }
            TokenKind::Ident(name) if self.peek().kind == TokenKind::LParen => {
                return self.call(&name, token.offset);
            }
            TokenKind::Ident(name) => Node::Var(name),
            other => {
                return Err(ExprError::new(
                    token.offset,
                    format!("expected a value, found '{}'", other.describe()),
                ))
            }
        };
        Ok((node, 1))
    }

    fn call(&mut self, name: &str, offset: usize) -> Parsed {
        let function = Function::lookup(name)
            .ok_or_else(|| ExprError::new(offset, format!("unknown function '{name}'")))?;
        self.expect(TokenKind::LParen)?;
        self.descend(offset)?;

        let mut args = Vec::new();
        let mut height = 0;
        if !self.eat(&TokenKind::RParen) {
            loop {
                let (arg, arg_height) = self.or()?;
                height = height.max(arg_height);
                args.push(arg);
                if self.eat(&TokenKind::RParen) {
                    break;
                }
                self.expect(TokenKind::Comma)?;
            }
        }
        self.ascend();

        if args.len() != function.arity() {
            return Err(ExprError::new(
                offset,
                format!(
                    "{}() takes {} argument(s), got {}",
                    function.name(),
                    function.arity(),
                    args.len()
                ),
            ));
        }
        Ok((Node::Call(function, args), Self::grow(height, offset)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Node> {
        Box::new(Node::Var(name.into()))
    }

    fn int(n: i64) -> Box<Node> {
        Box::new(Node::Literal(Value::from(n)))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let node = parse("a + b * 2").unwrap();

        assert_eq!(
            node,
            Node::Binary(
                BinaryOp::Add,
                var("a"),
                Box::new(Node::Binary(BinaryOp::Mul, var("b"), int(2)))
            )
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let node = parse("a || b && c").unwrap();

        assert_eq!(
            node,
            Node::Or(var("a"), Box::new(Node::And(var("b"), var("c"))))
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let node = parse("a - b - c").unwrap();

        assert_eq!(
            node,
            Node::Binary(
                BinaryOp::Sub,
                Box::new(Node::Binary(BinaryOp::Sub, var("a"), var("b"))),
                var("c")
            )
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let node = parse("(a + b) * 2").unwrap();

        assert!(matches!(node, Node::Binary(BinaryOp::Mul, _, _)));
    }

    #[test]
    fn calls_are_parsed() {
        let node = parse("has('user_count')").unwrap();

        assert_eq!(
            node,
            Node::Call(Function::Has, vec![Node::Literal(Value::from("user_count"))])
        );
    }

    #[test]
    fn unknown_function_is_rejected() {
        let err = parse("size(a)").unwrap_err();

        assert_eq!(err.offset, 0);
        assert!(err.message.contains("unknown function"));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(parse("has()").is_err());
        assert!(parse("len(a, b)").is_err());
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse("a == 1 2").unwrap_err();

        assert_eq!(err.offset, 7);
    }

    #[test]
    fn missing_operand_is_rejected() {
        assert!(parse("a ==").is_err());
        assert!(parse("(a").is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse("   ").is_err());
    }

    fn too_deep(err: &ExprError) -> bool {
        err.message.contains("nests deeper")
    }

    #[test]
    fn deeply_nested_parentheses_are_rejected() {
        let input = format!("{}true{}", "(".repeat(200_000), ")".repeat(200_000));

        let err = parse(&input).unwrap_err();

        assert!(too_deep(&err), "{err}");
        assert_eq!(err.offset, MAX_DEPTH);
    }

    #[test]
    fn long_unary_chains_are_rejected() {
        let input = format!("{}true", "!".repeat(100_000));

        assert!(too_deep(&parse(&input).unwrap_err()));
        assert!(too_deep(&parse(&format!("{}1", "-".repeat(100_000))).unwrap_err()));
    }

    #[test]
    fn nested_calls_are_rejected() {
        let input = format!("{}x{}", "len(".repeat(10_000), ")".repeat(10_000));

        assert!(too_deep(&parse(&input).unwrap_err()));
    }

    #[test]
    fn long_operator_chains_are_rejected() {
        let input = vec!["a"; 100_000].join(" + ");

        assert!(too_deep(&parse(&input).unwrap_err()));
    }

    #[test]
    fn chains_stacked_through_parentheses_are_bounded() {
        let chain = vec!["a"; 200].join(" && ");
        let input = format!("(({chain}) && {chain}) && {chain}");

        assert!(too_deep(&parse(&input).unwrap_err()));
    }

    #[test]
    fn nesting_up_to_the_limit_is_accepted() {
        let depth = MAX_DEPTH - 1;
        let input = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(parse(&input).unwrap(), Node::Var("a".into()));
        assert!(parse(&format!("{}true", "!".repeat(MAX_DEPTH - 1))).is_ok());
    }
}
