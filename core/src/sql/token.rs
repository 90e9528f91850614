/// SQL keywords, operators and punctuation.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Clauses
    SELECT,
    FROM,
    WHERE,
    GROUP_BY,
    ORDER_BY,
    LIMIT,
    OFFSET,
    INSERT_INTO,
    VALUES,
    UPDATE,
    SET,
    DELETE_FROM,

    // Joins
    INNER_JOIN,
    LEFT_OUTER_JOIN,
    ON,

    // Modifiers
    AS,
    DISTINCT,
    ASC,
    DESC,

    // Logic and predicates
    AND,
    OR,
    IN,
    NOT_IN,
    IS,
    IS_NOT,
    LIKE,
    NOT_LIKE,
    BETWEEN,
    NOT_BETWEEN,
    NULL,
    TRUE,
    FALSE,

    // Comparison
    EQ,
    NE,
    GT,
    GE,
    LT,
    LE,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
}

impl Token {
    /// Returns the SQL text of this token.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::GROUP_BY => "GROUP BY",
            Token::ORDER_BY => "ORDER BY",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::INSERT_INTO => "INSERT INTO",
            Token::VALUES => "VALUES",
            Token::UPDATE => "UPDATE",
            Token::SET => "SET",
            Token::DELETE_FROM => "DELETE FROM",
            Token::INNER_JOIN => "INNER JOIN",
            Token::LEFT_OUTER_JOIN => "LEFT OUTER JOIN",
            Token::ON => "ON",
            Token::AS => "AS",
            Token::DISTINCT => "DISTINCT",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::IN => "IN",
            Token::NOT_IN => "NOT IN",
            Token::IS => "IS",
            Token::IS_NOT => "IS NOT",
            Token::LIKE => "LIKE",
            Token::NOT_LIKE => "NOT LIKE",
            Token::BETWEEN => "BETWEEN",
            Token::NOT_BETWEEN => "NOT BETWEEN",
            Token::NULL => "NULL",
            Token::TRUE => "TRUE",
            Token::FALSE => "FALSE",
            Token::EQ => "=",
            Token::NE => "!=",
            Token::GT => ">",
            Token::GE => ">=",
            Token::LT => "<",
            Token::LE => "<=",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
        }
    }

    /// Comparison operators are always surrounded by spaces.
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ | Token::NE | Token::GT | Token::GE | Token::LT | Token::LE
        )
    }

    /// Punctuation never takes part in word spacing.
    pub const fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Token::LPAREN | Token::RPAREN | Token::COMMA | Token::DOT
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
