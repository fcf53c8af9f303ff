//! 文法モジュール。
//!
//! 文法は非終端記号の名前から、選択肢(パターン)の順序付きの列への対応表です。
//! すべてのパターンは読み込み時にコンパイルされ、項が参照する記号も
//! このときに解決されます。
//!
//! # ファイル形式
//!
//! 1行に1つの選択肢を`名前 -> パターン`の形式で書きます。同じ名前の行は
//! 出現順に選択肢として追加されます。空行と`#`で始まる行は無視されます。
//!
//! ```text
//! # 前置詞句
//! in_adverbial_modifier -> в {extended_objects case=loct}
//! ```
pub mod pattern;

use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::errors::{MorphgramError, Result};

pub use crate::grammar::pattern::{Clause, ClauseValue, Element, Guard, Pattern, Target, Term};

/// 1つの非終端記号とその選択肢
#[derive(Clone, Debug)]
pub struct Nonterminal {
    name: Arc<str>,
    rules: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Nonterminal {
    /// 記号の名前を返します。
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// 選択肢のパターン文字列を宣言順に返します。
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// コンパイル済みの選択肢を宣言順に返します。
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// 読み込み後に変更されない文法
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    nonterminals: Vec<Nonterminal>,
    index: HashMap<String, usize>,
    undefined: Vec<String>,
}

impl Grammar {
    /// `名前 -> パターン`形式の文法ファイルを読み込みます。
    ///
    /// # 引数
    ///
    /// * `rdr` - 文法ファイルのリーダー
    ///
    /// # エラー
    ///
    /// 行が`->`を含まない場合、名前が空の場合は[`MorphgramError::InvalidFormat`]を、
    /// パターンが不正な場合は[`MorphgramError::InvalidPattern`]を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut rules = vec![];
        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, pattern)) = line.split_once("->") else {
                return Err(MorphgramError::invalid_format(
                    "grammar",
                    format!("line {}: expected `name -> pattern`", i + 1),
                ));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(MorphgramError::invalid_format(
                    "grammar",
                    format!("line {}: the rule has no name", i + 1),
                ));
            }
            rules.push((name.to_string(), pattern.trim().to_string()));
        }
        Self::from_rules(rules)
    }

    /// `(名前, パターン)`の組の列から文法を作成します。
    ///
    /// 同じ名前の組は、現れた順に1つの非終端記号の選択肢になります。
    ///
    /// # エラー
    ///
    /// いずれかのパターンが不正な場合にエラーを返します。
    pub fn from_rules<I, N, P>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: AsRef<str>,
        P: AsRef<str>,
    {
        let mut grammar = Self::default();
        for (name, raw) in rules {
            let (name, raw) = (name.as_ref(), raw.as_ref());
            let pattern = Pattern::compile(raw).map_err(|e| e.in_nonterminal(name))?;
            let id = match grammar.index.get(name) {
                Some(&id) => id,
                None => {
                    let id = grammar.nonterminals.len();
                    grammar.index.insert(name.to_string(), id);
                    grammar.nonterminals.push(Nonterminal {
                        name: Arc::from(name),
                        rules: vec![],
                        patterns: vec![],
                    });
                    id
                }
            };
            let nt = &mut grammar.nonterminals[id];
            nt.rules.push(raw.to_string());
            nt.patterns.push(pattern);
        }
        grammar.link();
        Ok(grammar)
    }

    /// 各項が参照する記号を解決します。
    fn link(&mut self) {
        let mut undefined = vec![];
        for nt in &mut self.nonterminals {
            for pattern in &mut nt.patterns {
                for term in pattern.terms_mut() {
                    term.target = match term.name.as_deref() {
                        Some(name) => match self.index.get(name) {
                            Some(&id) => Target::Nonterminal(id),
                            None => {
                                undefined.push(name.to_string());
                                Target::Terminal
                            }
                        },
                        None => Target::Terminal,
                    };
                }
            }
        }
        undefined.sort_unstable();
        undefined.dedup();
        for name in &undefined {
            log::warn!("Symbol {name:?} has no rules and will match dictionary words");
        }
        self.undefined = undefined;
    }

    /// 指定された名前の選択肢のパターン文字列を宣言順に返します。
    ///
    /// 名前が文法にない場合は空のスライスを返します。
    pub fn rules_for(&self, name: &str) -> &[String] {
        self.nonterminal(name)
            .map(Nonterminal::rules)
            .unwrap_or_default()
    }

    /// 名前から非終端記号を取得します。
    pub fn nonterminal(&self, name: &str) -> Option<&Nonterminal> {
        self.index.get(name).map(|&id| &self.nonterminals[id])
    }

    #[inline(always)]
    pub(crate) fn nonterminal_id(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[inline(always)]
    pub(crate) fn nonterminal_by_id(&self, id: usize) -> &Nonterminal {
        &self.nonterminals[id]
    }

    /// 非終端記号を宣言順に列挙します。
    pub fn nonterminals(&self) -> impl Iterator<Item = &Nonterminal> {
        self.nonterminals.iter()
    }

    /// 項から参照されているが規則を持たない名前を、ソートして返します。
    ///
    /// これらの項は辞書の語として照合され、名前は無視されます。
    pub fn undefined_symbols(&self) -> &[String] {
        &self.undefined
    }

    /// 非終端記号の数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nonterminals.len()
    }

    /// 非終端記号を1つも持たない場合に`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nonterminals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() {
        let grammar = Grammar::from_reader(
            "# comment\n\
             np -> {pos=noun !case}\n\
             \n\
             np -> {pos=adjf case=@1} {pos=noun !case=@1}\n\
             pp -> в {np case=loct}\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(grammar.len(), 2);
        assert_eq!(
            grammar.rules_for("np"),
            ["{pos=noun !case}", "{pos=adjf case=@1} {pos=noun !case=@1}"]
        );
        assert!(grammar.rules_for("vp").is_empty());

        let pp = grammar.nonterminal("pp").unwrap();
        let term = pp.patterns()[0].terms().next().unwrap();
        assert_eq!(term.target(), Target::Nonterminal(0));
        assert!(grammar.undefined_symbols().is_empty());
    }

    #[test]
    fn test_undefined_symbols() {
        let grammar =
            Grammar::from_rules([("s", "{np !case} {vp}"), ("np", "{word pos=noun}")]).unwrap();
        assert_eq!(grammar.undefined_symbols(), ["vp", "word"]);
        let s = grammar.nonterminal("s").unwrap();
        let targets: Vec<_> = s.patterns()[0].terms().map(Term::target).collect();
        assert_eq!(targets, [Target::Nonterminal(1), Target::Terminal]);
    }

    #[test]
    fn test_missing_arrow() {
        assert!(matches!(
            Grammar::from_reader("np {pos=noun}\n".as_bytes()),
            Err(MorphgramError::InvalidFormat(_))
        ));
        assert!(matches!(
            Grammar::from_reader(" -> {pos=noun}\n".as_bytes()),
            Err(MorphgramError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        match Grammar::from_rules([("np", "{pos=noun")]) {
            Err(MorphgramError::InvalidPattern(e)) => {
                assert_eq!(e.nonterminal.as_deref(), Some("np"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
