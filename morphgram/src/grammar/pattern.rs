//! 文法パターンのコンパイラ
//!
//! 1つの選択肢を表すパターン文字列を、リテラルと制約付きの項の列に変換します。
//!
//! ```text
//! alt     := ['@'] element*
//! element := literal | '{' term '}'
//! term    := clause (' ' clause)*
//! clause  := ['!'] name ['=' (literalValue | '@' digits)]
//! ```
//!
//! 先頭の`@{...}`はガードで、入力を消費せず、呼び出し元から継承した属性に対して
//! 一度だけ評価されます。

use hashbrown::HashMap;

use crate::dictionary::feature::{AttrKind, Feature};
use crate::errors::{MorphgramError, Result};
use crate::utils::normalize_char;

/// 1つの選択肢内で有効な単一化変数の番号
///
/// パターン中の`@N`は、出現順に0から振り直されます。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// 束縛表の中での位置を返します。
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// 節の値
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseValue {
    /// 値なし(`name`)。属性が存在することだけを要求します。
    Any,
    /// 具体的な値(`name=value`)
    Literal(Feature),
    /// 単一化変数(`name=@N`)
    Variable(VarId),
}

/// 項の中の1つの属性制約
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Clause {
    pub kind: AttrKind,
    pub value: ClauseValue,
    /// `!`付きの節の値は、選択肢の導出結果として呼び出し元に公開されます。
    pub exported: bool,
}

/// 項が展開する対象
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Target {
    /// 辞書の語
    #[default]
    Terminal,
    /// 文法の非終端記号
    Nonterminal(usize),
}

/// `{...}`で囲まれた項
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Term {
    pub name: Option<String>,
    pub clauses: Vec<Clause>,
    pub(crate) target: Target,
}

impl Term {
    /// 項が展開する対象を返します。
    ///
    /// 名前に対応する規則が文法にない項は、辞書の語として扱われます。
    #[inline(always)]
    pub fn target(&self) -> Target {
        self.target
    }
}

/// 入力を消費しない前提条件
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Guard {
    pub value: Feature,
}

/// パターンの要素
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Element {
    /// 入力とそのまま照合される文字列(正規化済み)
    Literal(String),
    /// 制約付きの項
    Term(Term),
}

/// コンパイル済みのパターン
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    raw: String,
    guard: Option<Guard>,
    elements: Vec<Element>,
    num_vars: usize,
}

impl Pattern {
    /// パターン文字列をコンパイルします。
    ///
    /// リテラルは辞書と同じ規則で小文字化され、連続する空白は1つの空白にまとめられます。
    ///
    /// # 引数
    ///
    /// * `raw` - パターン文字列
    ///
    /// # エラー
    ///
    /// 括弧の対応が取れていない場合、空の項がある場合、節が不正な場合に
    /// [`MorphgramError::InvalidPattern`]を返します。
    pub fn compile(raw: &str) -> Result<Self> {
        Compiler::new(raw).run()
    }

    /// 元のパターン文字列を返します。
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// ガードを返します。
    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    /// ガード以外の要素を返します。
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// 選択肢内の単一化変数の数を返します。
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub(crate) fn terms_mut(&mut self) -> impl Iterator<Item = &mut Term> {
        self.elements.iter_mut().filter_map(|e| match e {
            Element::Term(t) => Some(t),
            Element::Literal(_) => None,
        })
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = &Term> {
        self.elements.iter().filter_map(|e| match e {
            Element::Term(t) => Some(t),
            Element::Literal(_) => None,
        })
    }
}

struct Compiler<'a> {
    raw: &'a str,
    vars: HashMap<u32, VarId>,
}

impl<'a> Compiler<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            vars: HashMap::new(),
        }
    }

    fn error<S>(&self, msg: S) -> MorphgramError
    where
        S: Into<String>,
    {
        MorphgramError::invalid_pattern(self.raw, msg)
    }

    fn run(mut self) -> Result<Pattern> {
        let mut rest = self.raw;
        let mut guard = None;

        if let Some(after) = rest.strip_prefix('@') {
            if !after.starts_with('{') {
                return Err(self.error("'@' must be followed by a guard term"));
            }
            let (content, after) = self.split_term(after)?;
            guard = Some(self.guard(content)?);
            rest = after;
        }

        let mut elements = vec![];
        while !rest.is_empty() {
            match rest.find(['{', '}']) {
                Some(i) if rest[i..].starts_with('}') => {
                    return Err(self.error("unbalanced '}'"));
                }
                Some(i) => {
                    push_literal(&mut elements, &rest[..i]);
                    let (content, after) = self.split_term(&rest[i..])?;
                    elements.push(Element::Term(self.term(content)?));
                    rest = after;
                }
                None => {
                    push_literal(&mut elements, rest);
                    rest = "";
                }
            }
        }

        Ok(Pattern {
            raw: self.raw.to_string(),
            guard,
            elements,
            num_vars: self.vars.len(),
        })
    }

    /// `{`で始まる文字列を、項の中身と`}`以降に分けます。
    fn split_term<'s>(&self, s: &'s str) -> Result<(&'s str, &'s str)> {
        debug_assert!(s.starts_with('{'));
        let body = &s[1..];
        match body.find(['{', '}']) {
            Some(i) if body[i..].starts_with('}') => Ok((&body[..i], &body[i + 1..])),
            Some(_) => Err(self.error("nested '{'")),
            None => Err(self.error("unbalanced '{'")),
        }
    }

    fn guard(&mut self, content: &str) -> Result<Guard> {
        let mut tokens = content.split_whitespace();
        let (Some(token), None) = (tokens.next(), tokens.next()) else {
            return Err(self.error("a guard must contain exactly one clause"));
        };
        match self.clause(token)? {
            Clause {
                value: ClauseValue::Literal(value),
                exported: false,
                ..
            } => Ok(Guard { value }),
            _ => Err(self.error(format!(
                "guard clause {token:?} must have the form name=value"
            ))),
        }
    }

    fn term(&mut self, content: &str) -> Result<Term> {
        let mut tokens = content.split_whitespace().peekable();
        let Some(&first) = tokens.peek() else {
            return Err(self.error("empty term"));
        };

        let mut name = None;
        if !first.starts_with('!') && !first.contains('=') && AttrKind::from_name(first).is_none()
        {
            if !first.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(self.error(format!("invalid symbol name {first:?}")));
            }
            name = Some(first.to_string());
            tokens.next();
        }

        let clauses = tokens
            .map(|token| self.clause(token))
            .collect::<Result<Vec<_>>>()?;

        Ok(Term {
            name,
            clauses,
            target: Target::Terminal,
        })
    }

    fn clause(&mut self, token: &str) -> Result<Clause> {
        let (exported, body) = match token.strip_prefix('!') {
            Some(body) => (true, body),
            None => (false, token),
        };
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let kind = AttrKind::from_name(name)
            .ok_or_else(|| self.error(format!("unknown attribute {name:?}")))?;

        let value = match value {
            None => ClauseValue::Any,
            Some(v) => match v.strip_prefix('@') {
                Some(digits) => ClauseValue::Variable(self.var(digits)?),
                None => Feature::parse(kind, v).map(ClauseValue::Literal).ok_or_else(|| {
                    self.error(format!("{v:?} is not a valid value of {kind}"))
                })?,
            },
        };

        Ok(Clause {
            kind,
            value,
            exported,
        })
    }

    fn var(&mut self, digits: &str) -> Result<VarId> {
        let n = match digits.parse::<u32>() {
            Ok(n) if n > 0 && digits.bytes().all(|b| b.is_ascii_digit()) => n,
            _ => {
                return Err(self.error(format!(
                    "variable @{digits} must be a positive integer"
                )));
            }
        };
        let next = VarId(self.vars.len());
        Ok(*self.vars.entry(n).or_insert(next))
    }
}

fn push_literal(elements: &mut Vec<Element>, text: &str) {
    let mut literal = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            if !literal.ends_with(' ') {
                literal.push(' ');
            }
        } else {
            literal.push(normalize_char(c));
        }
    }
    if !literal.is_empty() {
        elements.push(Element::Literal(literal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::feature::{Case, Number, PartOfSpeech};

    fn terms(p: &Pattern) -> Vec<&Term> {
        p.terms().collect()
    }

    #[test]
    fn test_literals_and_terms() {
        let p = Pattern::compile("В  {extended_objects case=loct}").unwrap();
        assert_eq!(p.elements().len(), 2);
        assert_eq!(p.elements()[0], Element::Literal("в ".to_string()));
        let t = terms(&p)[0];
        assert_eq!(t.name.as_deref(), Some("extended_objects"));
        assert_eq!(
            t.clauses,
            [Clause {
                kind: AttrKind::Case,
                value: ClauseValue::Literal(Feature::Case(Case::Loct)),
                exported: false,
            }]
        );
        assert!(p.guard().is_none());
    }

    #[test]
    fn test_variables_are_renumbered() {
        let p = Pattern::compile("{pos=adjf case=@7 number=@2} {pos=noun !case=@7 !number=@2}")
            .unwrap();
        assert_eq!(p.num_vars(), 2);
        let ts = terms(&p);
        assert_eq!(ts[0].name, None);
        assert_eq!(ts[0].clauses[1].value, ClauseValue::Variable(VarId(0)));
        assert_eq!(ts[0].clauses[2].value, ClauseValue::Variable(VarId(1)));
        assert_eq!(ts[1].clauses[1].value, ClauseValue::Variable(VarId(0)));
        assert!(ts[1].clauses[1].exported);
        assert_eq!(
            ts[1].clauses[0].value,
            ClauseValue::Literal(Feature::Pos(PartOfSpeech::Noun))
        );
    }

    #[test]
    fn test_guard() {
        let p = Pattern::compile("@{number=plur}{extended_object !case=@1}, {extended_objects case=@1}")
            .unwrap();
        assert_eq!(
            p.guard(),
            Some(&Guard {
                value: Feature::Number(Number::Plur)
            })
        );
        assert_eq!(p.elements().len(), 3);
        assert_eq!(p.elements()[1], Element::Literal(", ".to_string()));
    }

    #[test]
    fn test_bare_clauses() {
        let p = Pattern::compile("{pos=noun !case !number}").unwrap();
        let t = terms(&p)[0];
        assert_eq!(t.clauses[1].value, ClauseValue::Any);
        assert!(t.clauses[1].exported);
        assert_eq!(t.clauses[2].kind, AttrKind::Number);
    }

    #[test]
    fn test_trailing_literal() {
        let p = Pattern::compile("{a}.").unwrap();
        assert_eq!(p.elements()[1], Element::Literal(".".to_string()));
    }

    #[test]
    fn test_malformed() {
        for raw in [
            "{pos=noun",
            "pos=noun}",
            "{a {b}}",
            "{}",
            "{   }",
            "{pos=}",
            "{pos=nomn}",
            "{gender=masc}",
            "{case=@0}",
            "{case=@x}",
            "{a-b}",
            "@pos",
            "@{number=@1}",
            "@{!number=plur}",
            "@{number=plur case=nomn}",
        ] {
            assert!(
                matches!(Pattern::compile(raw), Err(MorphgramError::InvalidPattern(_))),
                "{raw:?} must be rejected"
            );
        }
    }
}
