//! SDL Loading
//!
//! Parses the subset of schema definition language the store cares about:
//! `type` (and `extend type`), `enum`, `scalar` and the `schema { ... }` block.
//! `interface`, `union`, `input` and `directive` definitions are parsed and
//! dropped. Descriptions are kept on fields and types.

use crate::error::{MockError, Result};
use crate::value::{Record, Value};

use super::{
    ArgumentDef, EnumType, FieldDef, NamedType, ObjectType, OutputType, ScalarType, Schema,
};

/// Parse a full SDL document
pub fn parse(source: &str) -> Result<Schema> {
    let mut parser = Parser::new(source)?;
    let schema = parser.document()?;
    tracing::debug!(types = schema.types.len(), "parsed schema from SDL");
    Ok(schema)
}

/// Parse a standalone type reference such as `[User!]!`
pub fn parse_type_reference(source: &str) -> Result<OutputType> {
    let mut parser = Parser::new(source)?;
    let ty = parser.type_reference()?;
    parser.expect_end()?;
    Ok(ty)
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Punct(char),
    Spread,
    Str(String),
    Int(i64),
    Float(f64),
    End,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    line: usize,
    column: usize,
}

fn tokenize(source: &str) -> Result<Vec<Spanned>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    macro_rules! advance {
        ($n:expr) => {
            for _ in 0..$n {
                if chars[i] == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
                i += 1;
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];
        let (start_line, start_column) = (line, column);

        // Whitespace and commas are insignificant
        if c.is_whitespace() || c == ',' || c == '\u{feff}' {
            advance!(1);
            continue;
        }

        if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                advance!(1);
            }
            continue;
        }

        let token = if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                advance!(1);
            }
            Token::Name(chars[start..i].iter().collect())
        } else if c == '-' || c.is_ascii_digit() {
            let start = i;
            let mut is_float = false;
            advance!(1);
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_digit() {
                    advance!(1);
                } else if d == '.' || d == 'e' || d == 'E' {
                    is_float = true;
                    advance!(1);
                    if i < chars.len() && (chars[i] == '-' || chars[i] == '+') {
                        advance!(1);
                    }
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let number = if is_float {
                text.parse().ok().map(Token::Float)
            } else {
                text.parse().ok().map(Token::Int)
            };
            number.ok_or_else(|| MockError::SdlParse {
                line: start_line,
                column: start_column,
                message: format!("invalid number {}", text),
            })?
        } else if c == '"' {
            let block = chars[i..].starts_with(&['"', '"', '"']);
            if block {
                advance!(3);
                let start = i;
                while i < chars.len() && !chars[i..].starts_with(&['"', '"', '"']) {
                    advance!(1);
                }
                if i >= chars.len() {
                    return Err(MockError::SdlParse {
                        line: start_line,
                        column: start_column,
                        message: "unterminated block string".to_string(),
                    });
                }
                let text: String = chars[start..i].iter().collect();
                advance!(3);
                Token::Str(dedent_block(&text))
            } else {
                advance!(1);
                let mut text = String::new();
                loop {
                    if i >= chars.len() || chars[i] == '\n' {
                        return Err(MockError::SdlParse {
                            line: start_line,
                            column: start_column,
                            message: "unterminated string".to_string(),
                        });
                    }
                    match chars[i] {
                        '"' => {
                            advance!(1);
                            break;
                        }
                        '\\' if i + 1 < chars.len() => {
                            let escaped = match chars[i + 1] {
                                'n' => '\n',
                                't' => '\t',
                                'r' => '\r',
                                other => other,
                            };
                            text.push(escaped);
                            advance!(2);
                        }
                        other => {
                            text.push(other);
                            advance!(1);
                        }
                    }
                }
                Token::Str(text)
            }
        } else if c == '.' {
            if !chars[i..].starts_with(&['.', '.', '.']) {
                return Err(MockError::SdlParse {
                    line: start_line,
                    column: start_column,
                    message: "unexpected '.'".to_string(),
                });
            }
            advance!(3);
            Token::Spread
        } else if "{}()[]:!=@|&".contains(c) {
            advance!(1);
            Token::Punct(c)
        } else {
            return Err(MockError::SdlParse {
                line: start_line,
                column: start_column,
                message: format!("unexpected character {:?}", c),
            });
        };

        tokens.push(Spanned {
            token,
            line: start_line,
            column: start_column,
        });
    }

    tokens.push(Spanned {
        token: Token::End,
        line,
        column,
    });
    Ok(tokens)
}

fn dedent_block(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .enumerate()
        .map(|(n, l)| if n == 0 { *l } else { l.get(indent..).unwrap_or("") })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// =============================================================================
// Parser
// =============================================================================

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> MockError {
        let spanned = &self.tokens[self.pos];
        MockError::SdlParse {
            line: spanned.line,
            column: spanned.column,
            message: message.into(),
        }
    }

    fn is_punct(&self, c: char) -> bool {
        self.peek() == &Token::Punct(c)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}', found {:?}", c, self.peek())))
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Token::Name(n) if n == keyword)
    }

    fn name(&mut self) -> Result<String> {
        if let Token::Name(n) = self.peek() {
            let n = n.clone();
            self.bump();
            Ok(n)
        } else {
            Err(self.error(format!("expected a name, found {:?}", self.peek())))
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek() {
            Token::End => Ok(()),
            other => Err(self.error(format!("unexpected trailing {:?}", other))),
        }
    }

    fn description(&mut self) -> Option<String> {
        if let Token::Str(s) = self.peek() {
            let s = s.clone();
            self.bump();
            Some(s)
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Definitions
    // -------------------------------------------------------------------------

    fn document(&mut self) -> Result<Schema> {
        let mut schema = Schema::new();

        while self.peek() != &Token::End {
            let description = self.description();
            let keyword = self.name()?;
            match keyword.as_str() {
                "schema" => self.schema_block(&mut schema)?,
                "type" => {
                    let mut object = self.object_definition()?;
                    object.description = description;
                    schema.add_type(NamedType::Object(object));
                }
                "extend" => self.extension(&mut schema)?,
                "enum" => {
                    let ty = self.enum_definition()?;
                    schema.add_type(NamedType::Enum(ty));
                }
                "scalar" => {
                    let name = self.name()?;
                    self.directives()?;
                    schema.add_type(NamedType::Scalar(ScalarType { name }));
                }
                "interface" => {
                    self.object_definition()?;
                }
                "input" => {
                    self.name()?;
                    self.directives()?;
                    if self.is_punct('{') {
                        self.input_fields('{', '}')?;
                    }
                }
                "union" => self.union_definition()?,
                "directive" => self.directive_definition()?,
                other => return Err(self.error(format!("unexpected definition keyword {}", other))),
            }
        }

        Ok(schema)
    }

    fn schema_block(&mut self, schema: &mut Schema) -> Result<()> {
        self.directives()?;
        self.expect_punct('{')?;
        while !self.eat_punct('}') {
            let operation = self.name()?;
            self.expect_punct(':')?;
            let type_name = self.name()?;
            match operation.as_str() {
                "query" => schema.set_query_type(type_name),
                "mutation" => schema.set_mutation_type(type_name),
                "subscription" => {}
                other => return Err(self.error(format!("unknown root operation {}", other))),
            }
        }
        Ok(())
    }

    fn extension(&mut self, schema: &mut Schema) -> Result<()> {
        let keyword = self.name()?;
        match keyword.as_str() {
            "type" => {
                let extension = self.object_definition()?;
                match schema.named_type_mut(&extension.name) {
                    Some(NamedType::Object(existing)) => {
                        existing.fields.extend(extension.fields);
                    }
                    Some(_) => {
                        return Err(self.error(format!("cannot extend non-object type {}", extension.name)))
                    }
                    None => schema.add_type(NamedType::Object(extension)),
                }
                Ok(())
            }
            "enum" => {
                let extension = self.enum_definition()?;
                match schema.named_type_mut(&extension.name) {
                    Some(NamedType::Enum(existing)) => existing.values.extend(extension.values),
                    _ => schema.add_type(NamedType::Enum(extension)),
                }
                Ok(())
            }
            "schema" => self.schema_block(schema),
            other => Err(self.error(format!("unsupported extension {}", other))),
        }
    }

    /// `Name implements A & B @dir { fields }` (also used for interfaces)
    fn object_definition(&mut self) -> Result<ObjectType> {
        let name = self.name()?;
        let mut object = ObjectType::new(name);

        if self.is_keyword("implements") {
            self.bump();
            self.eat_punct('&');
            self.name()?;
            while self.eat_punct('&') {
                self.name()?;
            }
        }
        self.directives()?;

        if self.eat_punct('{') {
            while !self.eat_punct('}') {
                object.fields.push(self.field_definition()?);
            }
        }
        Ok(object)
    }

    fn field_definition(&mut self) -> Result<FieldDef> {
        let description = self.description();
        let name = self.name()?;
        let args = if self.is_punct('(') {
            self.input_fields('(', ')')?
        } else {
            Vec::new()
        };
        self.expect_punct(':')?;
        let ty = self.type_reference()?;
        self.directives()?;

        Ok(FieldDef {
            name,
            ty,
            args,
            description,
        })
    }

    fn input_fields(&mut self, open: char, close: char) -> Result<Vec<ArgumentDef>> {
        self.expect_punct(open)?;
        let mut args = Vec::new();
        while !self.eat_punct(close) {
            self.description();
            let name = self.name()?;
            self.expect_punct(':')?;
            let ty = self.type_reference()?;
            let default_value = if self.eat_punct('=') {
                Some(self.const_value()?)
            } else {
                None
            };
            self.directives()?;
            args.push(ArgumentDef {
                name,
                ty,
                default_value,
            });
        }
        Ok(args)
    }

    fn enum_definition(&mut self) -> Result<EnumType> {
        let name = self.name()?;
        self.directives()?;
        let mut values = Vec::new();
        if self.eat_punct('{') {
            while !self.eat_punct('}') {
                self.description();
                values.push(self.name()?);
                self.directives()?;
            }
        }
        Ok(EnumType { name, values })
    }

    fn union_definition(&mut self) -> Result<()> {
        self.name()?;
        self.directives()?;
        if self.eat_punct('=') {
            self.eat_punct('|');
            self.name()?;
            while self.eat_punct('|') {
                self.name()?;
            }
        }
        Ok(())
    }

    fn directive_definition(&mut self) -> Result<()> {
        self.expect_punct('@')?;
        self.name()?;
        if self.is_punct('(') {
            self.input_fields('(', ')')?;
        }
        if self.is_keyword("repeatable") {
            self.bump();
        }
        if !self.is_keyword("on") {
            return Err(self.error("expected 'on' in directive definition"));
        }
        self.bump();
        self.eat_punct('|');
        self.name()?;
        while self.eat_punct('|') {
            self.name()?;
        }
        Ok(())
    }

    /// Directive applications are accepted and ignored
    fn directives(&mut self) -> Result<()> {
        while self.eat_punct('@') {
            self.name()?;
            if self.eat_punct('(') {
                while !self.eat_punct(')') {
                    self.name()?;
                    self.expect_punct(':')?;
                    self.const_value()?;
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Types and values
    // -------------------------------------------------------------------------

    fn type_reference(&mut self) -> Result<OutputType> {
        let ty = if self.eat_punct('[') {
            let inner = self.type_reference()?;
            self.expect_punct(']')?;
            OutputType::list(inner)
        } else {
            OutputType::named(self.name()?)
        };

        if self.eat_punct('!') {
            Ok(OutputType::non_null(ty))
        } else {
            Ok(ty)
        }
    }

    fn const_value(&mut self) -> Result<Value> {
        match self.peek().clone() {
            Token::Int(i) => {
                self.bump();
                Ok(Value::Int(i))
            }
            Token::Float(f) => {
                self.bump();
                Ok(Value::Float(f))
            }
            Token::Str(s) => {
                self.bump();
                Ok(Value::String(s))
            }
            Token::Name(n) => {
                self.bump();
                Ok(match n.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    // enum member
                    _ => Value::String(n),
                })
            }
            Token::Punct('[') => {
                self.bump();
                let mut items = Vec::new();
                while !self.eat_punct(']') {
                    items.push(self.const_value()?);
                }
                Ok(Value::List(items))
            }
            Token::Punct('{') => {
                self.bump();
                let mut record = Record::new();
                while !self.eat_punct('}') {
                    let key = self.name()?;
                    self.expect_punct(':')?;
                    record.insert(key, self.const_value()?);
                }
                Ok(Value::Record(record))
            }
            other => Err(self.error(format!("expected a value, found {:?}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE_DEFS: &str = r#"
        """
        A person
        """
        type User {
          id: ID!
          age: Int!
          name: String! @deprecated(reason: "use displayName")
          "Friends, paginated"
          friends(first: Int = 10, after: String): [User!]!
          role: Role
        }

        enum Role { ADMIN MEMBER GUEST }

        scalar DateTime

        type Query {
          viewer: User!
          userById(id: ID!): User!
        }

        interface Node { id: ID! }
        union SearchResult = User | Query
        input UserFilter { name: String, tags: [String!] = [] }
        directive @auth(requires: Role = ADMIN) on OBJECT | FIELD_DEFINITION
    "#;

    #[test]
    fn test_parse_object_fields() {
        let schema = parse(TYPE_DEFS).unwrap();
        let user = schema.object_type("User").unwrap();
        let names: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "age", "name", "friends", "role"]);
        assert_eq!(user.description.as_deref(), Some("A person"));

        let friends = user.field("friends").unwrap();
        assert_eq!(friends.ty.to_string(), "[User!]!");
        assert_eq!(friends.args.len(), 2);
        assert_eq!(friends.args[0].default_value, Some(Value::Int(10)));
        assert_eq!(friends.description.as_deref(), Some("Friends, paginated"));
    }

    #[test]
    fn test_parse_enum_and_scalar() {
        let schema = parse(TYPE_DEFS).unwrap();
        match schema.named_type("Role").unwrap() {
            NamedType::Enum(e) => assert_eq!(e.values, vec!["ADMIN", "MEMBER", "GUEST"]),
            other => panic!("Expected enum, got {:?}", other),
        }
        assert!(matches!(schema.named_type("DateTime").unwrap(), NamedType::Scalar(_)));
    }

    #[test]
    fn test_unsupported_definitions_are_dropped() {
        let schema = parse(TYPE_DEFS).unwrap();
        assert!(schema.named_type("Node").is_err());
        assert!(schema.named_type("SearchResult").is_err());
        assert!(schema.named_type("UserFilter").is_err());
    }

    #[test]
    fn test_schema_block_sets_roots() {
        let schema = parse(
            "schema { query: RootQuery mutation: RootMutation }
             type RootQuery { ok: Boolean }
             type RootMutation { touch: Boolean }",
        )
        .unwrap();
        assert_eq!(schema.query_type_name(), Some("RootQuery"));
        assert_eq!(schema.mutation_type_name(), Some("RootMutation"));
    }

    #[test]
    fn test_extend_type_appends_fields() {
        let schema = parse("type Query { a: Int } extend type Query { b: String }").unwrap();
        let query = schema.object_type("Query").unwrap();
        assert!(query.has_field("a"));
        assert!(query.has_field("b"));
    }

    #[test]
    fn test_parse_error_position() {
        match parse("type User {\n  id ID!\n}") {
            Err(MockError::SdlParse { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, 6);
            }
            other => panic!("Expected SdlParse, got {:?}", other),
        }
    }

    #[test]
    fn test_type_reference() {
        assert_eq!(
            parse_type_reference("[Int]!").unwrap(),
            OutputType::non_null(OutputType::list(OutputType::named("Int")))
        );
        assert!(parse_type_reference("[Int").is_err());
        assert!(parse_type_reference("Int extra").is_err());
    }
}
