use crate::sql::Token;

/// Comparison operators accepted in `{column: {operator: value}}` leaves.
///
/// The set is closed: a key that is not listed in [`Operator::from_key`] is an
/// error, never a silent equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    Is,
    IsNot,
    In,
    NotIn,
    Between,
    NotBetween,
    /// Array column contains the value: `@p IN UNNEST(col)`
    Contains,
    /// Column value is an element of the bound array: `col IN UNNEST(@p)`
    Contained,
}

/// How an operator consumes its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// `col <token> @p`
    Binary(Token),
    /// `col IS [NOT] NULL|TRUE|FALSE`
    Keyword(Token),
    /// `col [NOT] IN (@p0, ...)`
    List(Token),
    /// `col [NOT] BETWEEN @a AND @b`
    Range(Token),
    Contains,
    Contained,
}

impl Operator {
    /// Looks an operator up by its filter key.
    pub fn from_key(key: &str) -> Option<Self> {
        let op = match key {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "like" => Operator::Like,
            "notLike" => Operator::NotLike,
            "is" => Operator::Is,
            "not" | "isNot" => Operator::IsNot,
            "in" => Operator::In,
            "notIn" => Operator::NotIn,
            "between" => Operator::Between,
            "notBetween" => Operator::NotBetween,
            "contains" => Operator::Contains,
            "contained" => Operator::Contained,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical filter key.
    pub const fn key(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::NotLike => "notLike",
            Operator::Is => "is",
            Operator::IsNot => "not",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Between => "between",
            Operator::NotBetween => "notBetween",
            Operator::Contains => "contains",
            Operator::Contained => "contained",
        }
    }

    pub(crate) const fn operand(&self) -> Operand {
        match self {
            Operator::Eq => Operand::Binary(Token::EQ),
            Operator::Ne => Operand::Binary(Token::NE),
            Operator::Gt => Operand::Binary(Token::GT),
            Operator::Gte => Operand::Binary(Token::GE),
            Operator::Lt => Operand::Binary(Token::LT),
            Operator::Lte => Operand::Binary(Token::LE),
            Operator::Like => Operand::Binary(Token::LIKE),
            Operator::NotLike => Operand::Binary(Token::NOT_LIKE),
            Operator::Is => Operand::Keyword(Token::IS),
            Operator::IsNot => Operand::Keyword(Token::IS_NOT),
            Operator::In => Operand::List(Token::IN),
            Operator::NotIn => Operand::List(Token::NOT_IN),
            Operator::Between => Operand::Range(Token::BETWEEN),
            Operator::NotBetween => Operand::Range(Token::NOT_BETWEEN),
            Operator::Contains => Operand::Contains,
            Operator::Contained => Operand::Contained,
        }
    }
}

impl core::fmt::Display for Operator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Gte,
            Operator::NotLike,
            Operator::IsNot,
            Operator::NotIn,
            Operator::NotBetween,
            Operator::Contained,
        ] {
            assert_eq!(Operator::from_key(op.key()), Some(op));
        }
        assert_eq!(Operator::from_key("isNot"), Some(Operator::IsNot));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert_eq!(Operator::from_key("startsWith"), None);
        assert_eq!(Operator::from_key("GT"), None);
        assert_eq!(Operator::from_key(""), None);
    }
}
