//! 照合処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは入力文と、その文に対する展開結果のメモを保持します。
//! メモは`(非終端記号, 開始位置, 継承された属性)`をキーとし、同じ部分問題が
//! 複数の選択肢から参照されても一度しか計算しません。左再帰の規則は、
//! 計算中の同じキーに再び到達した時点で空の結果として打ち切られます。
//!
//! 展開は呼び出しスタックではなく`Frame`の明示的なスタックで進めるため、
//! 入れ子の深さはスレッドのスタックの大きさに制限されません。計算中のキーによって打ち切られた
//! 展開の結果は、そのキーより浅い展開に依存する場合にはメモに残しません。
use std::sync::Arc;

use hashbrown::HashMap;

use crate::dictionary::{AttrKind, Feature, Features};
use crate::errors::{MorphgramError, Result};
use crate::grammar::pattern::VarId;
use crate::grammar::{ClauseValue, Element, Grammar, Nonterminal, Target, Term};
use crate::matcher::Parser;
use crate::matcher::derivation::{ChildNode, Derivation, ParseMatch, PhraseNode, WordMatch};
use crate::sentence::Sentence;
use crate::utils::is_word_char;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct MemoKey {
    id: usize,
    start: usize,
    inherited: Features,
}

enum Memo {
    /// 展開中。値はスタック上の深さ。
    InProgress(usize),
    Done(Arc<[Arc<PhraseNode>]>),
}

/// 選択肢の途中まで照合した状態
#[derive(Clone, Debug)]
struct Attempt {
    pos: usize,
    bindings: Vec<Option<Feature>>,
    exports: Vec<Export>,
    children: Vec<ChildNode>,
}

/// 選択肢の結果として公開される値
#[derive(Clone, Copy, Debug)]
enum Export {
    Value(Feature),
    // Resolved when the alternative completes.
    Variable(AttrKind, VarId),
}

impl Attempt {
    fn new(pos: usize, num_vars: usize) -> Self {
        Self {
            pos,
            bindings: vec![None; num_vars],
            exports: vec![],
            children: vec![],
        }
    }

    fn branch(
        &self,
        end: usize,
        bindings: Vec<Option<Feature>>,
        exports: &[Export],
        child: ChildNode,
    ) -> Self {
        let mut children = Vec::with_capacity(self.children.len() + 1);
        children.extend_from_slice(&self.children);
        children.push(child);
        let mut all_exports = self.exports.clone();
        all_exports.extend_from_slice(exports);
        Self {
            pos: end,
            bindings,
            exports: all_exports,
            children,
        }
    }

    /// 公開値をすべて具体的な値に解決します。
    ///
    /// 束縛されないままの変数がある場合、または同じ属性に異なる値が
    /// 公開される場合は`None`を返します。
    fn resolve_exports(&self) -> Option<Features> {
        let mut attributes = Features::default();
        for export in &self.exports {
            let value = match *export {
                Export::Value(v) => v,
                Export::Variable(kind, var) => {
                    self.bindings[var.index()].filter(|v| v.kind() == kind)?
                }
            };
            match attributes.get(value.kind()) {
                Some(existing) if existing != value => return None,
                _ => attributes.set(value),
            }
        }
        Some(attributes)
    }
}

/// 展開中の非終端記号
///
/// 選択肢の要素を1つずつ、生きているすべての試行について進めます。
struct Frame {
    key: MemoKey,
    depth: usize,
    alt: usize,
    elem: usize,
    // Attempts not yet advanced over `elem`, last one first.
    pending: Vec<Attempt>,
    advanced: Vec<Attempt>,
    results: Vec<Arc<PhraseNode>>,
    // Shallowest in-progress expansion that cut this one or its callees.
    low: usize,
}

impl Frame {
    fn new(key: MemoKey, depth: usize, nt: &Nonterminal) -> Self {
        let mut frame = Self {
            key,
            depth,
            alt: 0,
            elem: 0,
            pending: vec![],
            advanced: vec![],
            results: vec![],
            low: depth,
        };
        frame.start_alternative(nt);
        frame
    }

    /// `alt`以降で、ガードを満たす最初の選択肢の照合を始めます。
    ///
    /// ガードの属性が継承されていない場合、ガードは満たされているとみなします。
    fn start_alternative(&mut self, nt: &Nonterminal) {
        self.elem = 0;
        self.pending.clear();
        self.advanced.clear();
        while let Some(pattern) = nt.patterns().get(self.alt) {
            let blocked = pattern.guard().is_some_and(|guard| {
                self.key
                    .inherited
                    .get(guard.value.kind())
                    .is_some_and(|v| v != guard.value)
            });
            if !blocked {
                self.pending
                    .push(Attempt::new(self.key.start, pattern.num_vars()));
                return;
            }
            self.alt += 1;
        }
    }

    /// 呼び出した展開の導出で、待機中の試行を進めます。
    fn resume(&mut self, grammar: &Grammar, derivations: &[Arc<PhraseNode>]) {
        let pattern = &grammar.nonterminal_by_id(self.key.id).patterns()[self.alt];
        if let (Some(Element::Term(term)), Some(attempt)) =
            (pattern.elements().get(self.elem), self.pending.pop())
        {
            match_phrase(term, &attempt, derivations, &mut self.advanced);
        }
    }
}

enum Step {
    Continue,
    Call(MemoKey),
    Finished,
}

/// 照合処理のためのルーチンを提供する構造体。
///
/// 入力文とメモを保持し、同じ文に対する複数回の照合でそれらを再利用します。
///
/// # 例
///
/// ```ignore
/// let mut worker = parser.new_worker();
/// worker.reset_sentence("В больничном дворе стоят дома.");
/// worker.parse_complete("sentence")?;
/// for d in worker.derivation_iter() {
///     println!("{} {}", d.surface(), d.attributes());
/// }
/// ```
pub struct Worker {
    pub(crate) parser: Parser,
    pub(crate) sent: Sentence,
    memo: HashMap<MemoKey, Memo>,
    words: Vec<Option<Arc<[WordMatch]>>>,
    results: Vec<Arc<PhraseNode>>,
}

impl Worker {
    pub(crate) fn new(parser: Parser) -> Self {
        let mut worker = Self {
            parser,
            sent: Sentence::new(),
            memo: HashMap::new(),
            words: vec![],
            results: vec![],
        };
        worker.reset_sentence("");
        worker
    }

    /// 照合する入力文をリセットします。
    ///
    /// 以前の文の照合結果とメモは破棄されます。
    ///
    /// # 引数
    ///
    /// * `input` - 入力文字列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.memo.clear();
        self.results.clear();
        self.sent.set_sentence(input);
        self.words.clear();
        self.words.resize(self.sent.len_char() + 1, None);
    }

    /// 正規化後の入力文の文字数を返します。
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.sent.len_char()
    }

    /// `offset`から始まる`start`のすべての導出を求めます。
    ///
    /// `start`が文法の非終端記号でない場合は、辞書の1語として照合されます。
    /// 結果は`num_derivations()`、`derivation()`、`derivation_iter()`で取得できます。
    ///
    /// # 引数
    ///
    /// * `start` - 開始記号の名前
    /// * `offset` - 正規化後の文字位置
    ///
    /// # 戻り値
    ///
    /// 導出の数。一致しない場合は0。
    ///
    /// # エラー
    ///
    /// `offset`が文の終端を超える場合にエラーを返します。
    pub fn parse(&mut self, start: &str, offset: usize) -> Result<usize> {
        self.parse_with(start, offset, Features::default())
    }

    /// 継承された属性を与えて`start`の導出を求めます。
    ///
    /// `inherited`は文法中の`{start case=gent}`のような項の制約と同様に、
    /// ガードの判定に使われます。辞書の語として照合される場合は、
    /// `inherited`のすべての値を持つ読みだけが一致します。
    ///
    /// # エラー
    ///
    /// `offset`が文の終端を超える場合にエラーを返します。
    pub fn parse_with(&mut self, start: &str, offset: usize, inherited: Features) -> Result<usize> {
        self.results.clear();
        if offset > self.sent.len_char() {
            return Err(MorphgramError::invalid_argument(
                "offset",
                format!(
                    "{offset} is beyond the end of the sentence ({} chars)",
                    self.sent.len_char()
                ),
            ));
        }

        let results = match self.parser.grammar().nonterminal_id(start) {
            Some(id) => self.expand(id, offset, inherited).to_vec(),
            None => {
                log::debug!("{start:?} is not a nonterminal; matching a dictionary word");
                self.match_start_word(start, offset, inherited)
            }
        };
        self.results = results;
        log::debug!(
            "Parsed {start:?} at {offset}: {} derivations, {} memo entries",
            self.results.len(),
            self.memo.len()
        );
        Ok(self.results.len())
    }

    /// 文頭から始まり、文末までを覆う`start`の導出だけを求めます。
    ///
    /// 文頭と文末の空白は無視されます。
    ///
    /// # エラー
    ///
    /// [`Worker::parse`]と同じ条件でエラーを返します。
    pub fn parse_complete(&mut self, start: &str) -> Result<usize> {
        let offset = self.sent.skip_space(0);
        self.parse(start, offset)?;
        let sent = &self.sent;
        self.results.retain(|d| sent.is_end(d.end));
        Ok(self.results.len())
    }

    /// 直前の照合で得られた導出の数を返します。
    #[inline(always)]
    pub fn num_derivations(&self) -> usize {
        self.results.len()
    }

    /// `i`番目の導出を返します。
    ///
    /// 導出は選択肢の宣言順に並びます。
    #[inline(always)]
    pub fn derivation(&self, i: usize) -> Derivation<'_> {
        Derivation::new(self, &self.results[i])
    }

    /// 導出のイテレータを作成します。
    pub fn derivation_iter(&self) -> impl Iterator<Item = Derivation<'_>> {
        self.results.iter().map(|n| Derivation::new(self, n))
    }

    /// すべての導出を所有型の木に変換します。
    pub fn to_matches(&self) -> Vec<ParseMatch> {
        self.derivation_iter().map(|d| d.to_match()).collect()
    }

    /// 非終端記号`id`を`start`から展開します。
    fn expand(&mut self, id: usize, start: usize, inherited: Features) -> Arc<[Arc<PhraseNode>]> {
        let root = MemoKey {
            id,
            start,
            inherited,
        };
        if let Some(Memo::Done(results)) = self.memo.get(&root) {
            return Arc::clone(results);
        }

        let grammar = Arc::clone(self.parser.shared_grammar());
        let mut stack: Vec<Frame> = vec![];
        let mut call = Some(root);
        loop {
            if let Some(key) = call.take() {
                let depth = stack.len();
                self.memo.insert(key, Memo::InProgress(depth));
                stack.push(Frame::new(key, depth, grammar.nonterminal_by_id(key.id)));
            }
            let Some(frame) = stack.last_mut() else {
                break;
            };
            match self.step(&grammar, frame) {
                Step::Continue => {}
                Step::Call(key) => call = Some(key),
                Step::Finished => {
                    let Some(frame) = stack.pop() else {
                        break;
                    };
                    let results: Arc<[Arc<PhraseNode>]> = frame.results.into();
                    if frame.low < frame.depth {
                        // Recomputed on the next visit.
                        self.memo.remove(&frame.key);
                    } else {
                        self.memo.insert(frame.key, Memo::Done(Arc::clone(&results)));
                    }
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.low = parent.low.min(frame.low);
                            parent.resume(&grammar, &results);
                        }
                        None => return results,
                    }
                }
            }
        }
        Arc::from([])
    }

    /// 展開中の非終端記号を1段階進めます。
    fn step(&mut self, grammar: &Grammar, frame: &mut Frame) -> Step {
        let nt = grammar.nonterminal_by_id(frame.key.id);
        let Some(pattern) = nt.patterns().get(frame.alt) else {
            return Step::Finished;
        };

        let Some(element) = pattern.elements().get(frame.elem) else {
            let limit = self.parser.derivation_limit();
            while let Some(attempt) = frame.pending.pop() {
                let Some(attributes) = attempt.resolve_exports() else {
                    continue;
                };
                frame.results.push(Arc::new(PhraseNode {
                    name: Arc::clone(nt.shared_name()),
                    start: frame.key.start,
                    end: attempt.pos,
                    attributes,
                    children: attempt.children,
                }));
                if limit.is_some_and(|max| frame.results.len() >= max) {
                    return Step::Finished;
                }
            }
            frame.alt += 1;
            frame.start_alternative(nt);
            return Step::Continue;
        };

        let Some(attempt) = frame.pending.pop() else {
            if frame.advanced.is_empty() {
                frame.alt += 1;
                frame.start_alternative(nt);
            } else {
                frame.elem += 1;
                frame.pending = std::mem::take(&mut frame.advanced);
                frame.pending.reverse();
            }
            return Step::Continue;
        };

        match element {
            Element::Literal(text) => {
                if let Some(end) = self.sent.match_at(attempt.pos, text) {
                    frame.advanced.push(Attempt {
                        pos: end,
                        ..attempt
                    });
                }
            }
            Element::Term(term) => match term.target() {
                Target::Terminal => self.match_word(term, &attempt, &mut frame.advanced),
                Target::Nonterminal(id) => {
                    let callee = MemoKey {
                        id,
                        start: attempt.pos,
                        inherited: callee_features(term, &attempt),
                    };
                    match self.memo.get(&callee) {
                        Some(Memo::Done(derivations)) => {
                            let derivations = Arc::clone(derivations);
                            match_phrase(term, &attempt, &derivations, &mut frame.advanced);
                        }
                        Some(&Memo::InProgress(depth)) => frame.low = frame.low.min(depth),
                        None => {
                            frame.pending.push(attempt);
                            return Step::Call(callee);
                        }
                    }
                }
            },
        }
        Step::Continue
    }

    /// 辞書の語として項を照合します。
    fn match_word(&mut self, term: &Term, attempt: &Attempt, next: &mut Vec<Attempt>) {
        let words = self.words_at(attempt.pos);
        'words: for m in words.iter() {
            let mut bindings = attempt.bindings.clone();
            let mut exports = vec![];
            for clause in &term.clauses {
                let Some(actual) = m.features.get(clause.kind) else {
                    continue 'words;
                };
                match clause.value {
                    ClauseValue::Any => {}
                    ClauseValue::Literal(v) => {
                        if actual != v {
                            continue 'words;
                        }
                    }
                    ClauseValue::Variable(var) => match bindings[var.index()] {
                        Some(bound) if bound != actual => continue 'words,
                        Some(_) => {}
                        None => bindings[var.index()] = Some(actual),
                    },
                }
                if clause.exported {
                    exports.push(Export::Value(actual));
                }
            }
            next.push(attempt.branch(m.end, bindings, &exports, ChildNode::Word(m.clone())));
        }
    }


    /// 開始記号が非終端記号でない場合に、辞書の1語として照合します。
    fn match_start_word(
        &mut self,
        name: &str,
        start: usize,
        inherited: Features,
    ) -> Vec<Arc<PhraseNode>> {
        let name: Arc<str> = Arc::from(name);
        self.words_at(start)
            .iter()
            .filter(|m| inherited.iter().all(|f| m.features.get(f.kind()) == Some(f)))
            .map(|m| {
                Arc::new(PhraseNode {
                    name: Arc::clone(&name),
                    start: m.start,
                    end: m.end,
                    attributes: m.features,
                    children: vec![ChildNode::Word(m.clone())],
                })
            })
            .collect()
    }

    /// `pos`から始まる辞書の語の候補を返します。
    fn words_at(&mut self, pos: usize) -> Arc<[WordMatch]> {
        if let Some(words) = &self.words[pos] {
            return Arc::clone(words);
        }
        let words: Arc<[WordMatch]> = self.lookup_words(pos).into();
        self.words[pos] = Some(Arc::clone(&words));
        words
    }

    fn lookup_words(&self, pos: usize) -> Vec<WordMatch> {
        let end = self.sent.word_end(pos);
        if end == pos {
            return vec![];
        }
        let word: String = self.sent.chars()[pos..end].iter().collect();

        let dict = self.parser.dictionary();
        let mut matches = vec![];
        for form in dict.lookup_with_separator(&word, self.parser.separator_str()) {
            let end = if form.text.len() == word.len() {
                end
            } else {
                // A multi-word entry must cover whole words of the input.
                match self.sent.match_at(pos, form.text) {
                    Some(e) if self.sent.chars().get(e).is_none_or(|&c| !is_word_char(c)) => e,
                    _ => continue,
                }
            };
            matches.push(WordMatch {
                start: pos,
                end,
                features: form.features,
            });
        }
        matches
    }
}

/// 項の制約のうち、呼び出す非終端記号に継承される値を集めます。
///
/// リテラルと束縛済みの変数の値が継承され、未束縛の変数は継承されません。
fn callee_features(term: &Term, attempt: &Attempt) -> Features {
    let mut inherited = Features::default();
    for clause in &term.clauses {
        let value = match clause.value {
            ClauseValue::Literal(v) => Some(v),
            ClauseValue::Variable(var) => attempt.bindings[var.index()],
            ClauseValue::Any => None,
        };
        if let Some(v) = value.filter(|v| v.kind() == clause.kind) {
            inherited.set(v);
        }
    }
    inherited
}

/// 非終端記号の導出を項の制約と単一化します。
fn match_phrase(
    term: &Term,
    attempt: &Attempt,
    derivations: &[Arc<PhraseNode>],
    next: &mut Vec<Attempt>,
) {
    'derivations: for d in derivations.iter() {
        let mut bindings = attempt.bindings.clone();
        let mut exports = vec![];
        for clause in &term.clauses {
            let exported = d.attributes.get(clause.kind);
            match clause.value {
                ClauseValue::Any => {
                    let Some(v) = exported else {
                        continue 'derivations;
                    };
                    if clause.exported {
                        exports.push(Export::Value(v));
                    }
                }
                ClauseValue::Literal(v) => {
                    if exported.is_some_and(|e| e != v) {
                        continue 'derivations;
                    }
                    if clause.exported {
                        exports.push(Export::Value(v));
                    }
                }
                ClauseValue::Variable(var) => {
                    match (bindings[var.index()], exported) {
                        (Some(bound), Some(e)) if bound != e => continue 'derivations,
                        (None, Some(e)) => bindings[var.index()] = Some(e),
                        _ => {}
                    }
                    if clause.exported {
                        exports.push(Export::Variable(clause.kind, var));
                    }
                }
            }
        }
        next.push(attempt.branch(
            d.end,
            bindings,
            &exports,
            ChildNode::Phrase(Arc::clone(d)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::{Case, DictionaryBuilder, Number};
    use crate::matcher::derivation::Child;

    fn parser(lexicon: &str, rules: &[(&str, &str)]) -> Parser {
        Parser::new(
            DictionaryBuilder::from_text(lexicon).unwrap(),
            Grammar::from_rules(rules.iter().copied()).unwrap(),
        )
    }

    #[test]
    fn test_literal_only() {
        let parser = parser("", &[("greeting", "Привет, мир")]);
        let mut worker = parser.new_worker();
        worker.reset_sentence("ПРИВЕТ,   мир!");
        assert_eq!(worker.parse("greeting", 0).unwrap(), 1);
        let d = worker.derivation(0);
        assert_eq!(d.range_char(), 0..11);
        assert_eq!(d.surface(), "ПРИВЕТ,   мир");
        assert!(d.attributes().is_empty());
        assert_eq!(d.num_children(), 0);
    }

    #[test]
    fn test_offset_out_of_range() {
        let parser = parser("дом\tnoun", &[("np", "{pos=noun}")]);
        let mut worker = parser.new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("np", 3).unwrap(), 0);
        assert!(matches!(
            worker.parse("np", 4),
            Err(MorphgramError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_start_word() {
        let parser = parser("дом\tnoun,sing,nomn\nдом\tnoun,sing,accs", &[]);
        let mut worker = parser.new_worker();
        worker.reset_sentence("Дом");
        assert_eq!(worker.parse("word", 0).unwrap(), 2);
        let mut inherited = Features::default();
        inherited.set(Feature::Case(Case::Accs));
        assert_eq!(worker.parse_with("word", 0, inherited).unwrap(), 1);
        assert_eq!(worker.derivation(0).name(), "word");
        assert_eq!(worker.derivation(0).attributes().case, Some(Case::Accs));
    }

    #[test]
    fn test_multi_word_entry() {
        let parser = parser(
            "по\tprep\nпо крайней мере\tadvb\nкрайней\tadjf",
            &[("adv", "{pos=advb}")],
        );
        let mut worker = parser.new_worker();
        worker.reset_sentence("По  крайней мере");
        assert_eq!(worker.parse("adv", 0).unwrap(), 1);
        assert_eq!(worker.derivation(0).surface(), "По  крайней мере");

        worker.reset_sentence("по крайней меревка");
        assert_eq!(worker.parse("adv", 0).unwrap(), 0);

        let parser = parser
            .clone()
            .separator("");
        let mut worker = parser.new_worker();
        worker.reset_sentence("по крайней мере");
        assert_eq!(worker.parse("adv", 0).unwrap(), 0);
    }

    #[test]
    fn test_unbound_export_drops_branch() {
        let parser = parser(
            "дом\tnoun,sing,nomn\nон\tnpro",
            &[("np", "{x !number=@1}"), ("x", "{pos=noun}"), ("x", "{pos=npro}")],
        );
        let mut worker = parser.new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("np", 0).unwrap(), 0);
    }

    #[test]
    fn test_guard_gates_without_exporting() {
        let parser = parser(
            "дома\tnoun,plur,nomn\nдом\tnoun,sing,nomn",
            &[("many", "@{number=plur}{pos=noun}")],
        );
        let mut worker = parser.new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("many", 0).unwrap(), 1);
        assert!(worker.derivation(0).attributes().is_empty());

        let mut inherited = Features::default();
        inherited.set(Feature::Number(Number::Sing));
        assert_eq!(worker.parse_with("many", 0, inherited).unwrap(), 0);

        inherited.set(Feature::Number(Number::Plur));
        assert_eq!(worker.parse_with("many", 0, inherited).unwrap(), 1);
        assert!(worker.derivation(0).attributes().is_empty());
    }

    #[test]
    fn test_left_recursion_terminates() {
        let parser = parser(
            "дом\tnoun",
            &[("list", "{list}, {pos=noun}"), ("list", "{pos=noun}")],
        );
        let mut worker = parser.new_worker();
        worker.reset_sentence("дом, дом");
        assert_eq!(worker.parse("list", 0).unwrap(), 1);
        assert_eq!(worker.derivation(0).range_char(), 0..3);
    }

    #[test]
    fn test_memo_is_order_independent() {
        let rules = [
            ("top", "{b}"),
            ("top", "{a}"),
            ("a", "{b}"),
            ("b", "{a} !"),
            ("b", "{pos=noun}"),
        ];
        let parser = parser("дом\tnoun", &rules);

        let mut worker = parser.new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("a", 0).unwrap(), 1);
        assert_eq!(worker.parse("top", 0).unwrap(), 2);

        let mut worker = parser.new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("top", 0).unwrap(), 2);
        assert_eq!(worker.parse("a", 0).unwrap(), 1);
        assert_eq!(worker.parse("b", 0).unwrap(), 1);
    }

    #[test]
    fn test_long_right_recursive_list() {
        let parser = parser(
            "дом\tnoun,sing,nomn",
            &[
                ("list", "{pos=noun !case}."),
                ("list", "{pos=noun !case=@1}, {list case=@1}"),
            ],
        );
        let n = 5000;
        let input = format!("{}.", vec!["дом"; n].join(", "));
        let mut worker = parser.new_worker();
        worker.reset_sentence(&input);
        assert_eq!(worker.parse_complete("list").unwrap(), 1);

        let d = worker.derivation(0);
        assert_eq!(d.range_char(), 0..worker.len_char());
        assert_eq!(d.attributes().case, Some(Case::Nomn));
        assert_eq!(d.num_children(), 2);

        let mut depth = 1;
        let mut node = d;
        while let Some(Child::Phrase(p)) = node.children().last() {
            depth += 1;
            node = p;
        }
        assert_eq!(depth, n);
    }

    #[test]
    fn test_max_derivations() {
        let parser = parser(
            "дом\tnoun,sing,nomn\nдом\tnoun,sing,accs\nдом\tnoun,sing,loct",
            &[("np", "{pos=noun !case}")],
        );
        let mut worker = parser.clone().max_derivations(2).new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("np", 0).unwrap(), 2);

        let mut worker = parser.max_derivations(0).new_worker();
        worker.reset_sentence("дом");
        assert_eq!(worker.parse("np", 0).unwrap(), 3);
    }
}
