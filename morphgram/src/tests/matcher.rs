use crate::dictionary::{Case, DictionaryBuilder, Feature, Features, Number, PartOfSpeech};
use crate::grammar::Grammar;
use crate::matcher::Parser;
use crate::matcher::derivation::{Child, ParseMatch};

const LEXICON: &str = include_str!("./resources/lexicon.txt");
const GRAMMAR: &str = include_str!("./resources/grammar.txt");

fn sample_parser() -> Parser {
    Parser::new(
        DictionaryBuilder::from_text(LEXICON).unwrap(),
        Grammar::from_reader(GRAMMAR.as_bytes()).unwrap(),
    )
}

fn phrase<'a>(m: &'a ParseMatch, name: &str) -> &'a ParseMatch {
    m.children
        .iter()
        .find(|c| c.name.as_deref() == Some(name))
        .unwrap()
}

#[test]
fn test_sample_grammar_loads() {
    let grammar = Grammar::from_reader(GRAMMAR.as_bytes()).unwrap();
    assert_eq!(grammar.len(), 5);
    assert_eq!(grammar.rules_for("extended_objects").len(), 3);
    assert!(grammar.undefined_symbols().is_empty());
}

/// 形容詞と名詞の格・数の一致
#[test]
fn test_unification_consistency() {
    let dict = DictionaryBuilder::from_text(
        "большой\tadjf,nomn,sing\nдом\tnoun,nomn,sing\nдом\tnoun,accs,sing\n",
    )
    .unwrap();
    let grammar = Grammar::from_rules([(
        "np",
        "{pos=adjf case=@1 number=@2} {pos=noun !case=@1 !number=@2}",
    )])
    .unwrap();
    let parser = Parser::new(dict, grammar);
    let mut worker = parser.new_worker();

    worker.reset_sentence("большой дом");
    assert_eq!(worker.parse("np", 0).unwrap(), 1);

    let d = worker.derivation(0);
    assert_eq!(d.range_char(), 0..11);
    assert_eq!(d.attributes().case, Some(Case::Nomn));
    assert_eq!(d.attributes().number, Some(Number::Sing));
    assert_eq!(d.attributes().pos, None);

    let words: Vec<_> = d
        .children()
        .map(|c| match c {
            Child::Word(w) => (w.surface(), w.features().case),
            Child::Phrase(p) => panic!("unexpected phrase {p:?}"),
        })
        .collect();
    assert_eq!(
        words,
        [("большой", Some(Case::Nomn)), ("дом", Some(Case::Nomn))]
    );
}

/// 同じ属性が異なる値で公開される場合、その導出は捨てられる
#[test]
fn test_conflicting_exports() {
    let dict = DictionaryBuilder::from_text("дом\tnoun,sing,nomn\nдома\tnoun,sing,gent\n").unwrap();
    let grammar = Grammar::from_rules([("np", "{pos=noun !case} {pos=noun !case}")]).unwrap();
    let parser = Parser::new(dict, grammar);
    let mut worker = parser.new_worker();

    worker.reset_sentence("дом дома");
    assert_eq!(worker.parse("np", 0).unwrap(), 0);

    worker.reset_sentence("дом дом");
    assert_eq!(worker.parse("np", 0).unwrap(), 1);
    assert_eq!(worker.derivation(0).attributes().to_string(), "nomn");
}

/// 同じ範囲に一致する2つの選択肢は、それぞれ導出を返す
#[test]
fn test_ambiguity() {
    let dict = DictionaryBuilder::from_text("дом\tnoun,sing,nomn\n").unwrap();
    let grammar =
        Grammar::from_rules([("np", "{pos=noun !case}"), ("np", "{pos=noun !number}")]).unwrap();
    let parser = Parser::new(dict, grammar);
    let mut worker = parser.new_worker();

    worker.reset_sentence("дом");
    assert_eq!(worker.parse("np", 0).unwrap(), 2);
    assert_eq!(worker.derivation(0).range_char(), 0..3);
    assert_eq!(worker.derivation(1).range_char(), 0..3);
    assert_eq!(worker.derivation(0).attributes().to_string(), "nomn");
    assert_eq!(worker.derivation(1).attributes().to_string(), "sing");
}

#[test]
fn test_sample_sentence() {
    let parser = sample_parser();
    let mut worker = parser.new_worker();

    let input = "В больничном дворе стоят дома, покрытые снегом.";
    worker.reset_sentence(input);
    assert_eq!(worker.parse_complete("sentence").unwrap(), 2);

    let matches = worker.to_matches();
    let mut cases = vec![];
    for m in &matches {
        assert_eq!(m.name.as_deref(), Some("sentence"));
        assert_eq!(m.text, input);
        assert_eq!(m.range_byte, 0..input.len());
        assert!(m.attributes.is_empty());
        assert_eq!(m.children.len(), 4);

        let modifier = phrase(m, "in_adverbial_modifier");
        assert_eq!(modifier.text, "В больничном дворе");
        assert_eq!(modifier.range_char, 0..18);

        let verb = &m.children[1];
        assert_eq!(verb.name, None);
        assert_eq!(verb.text, "стоят");
        assert_eq!(verb.attributes.pos, Some(PartOfSpeech::Verb));

        let objects = phrase(m, "extended_objects");
        assert_eq!(objects.text, "дома");
        assert_eq!(objects.attributes.number, Some(Number::Plur));

        let participle = phrase(m, "participle_phrase");
        assert_eq!(participle.text, "покрытые снегом");
        assert_eq!(participle.attributes.case, objects.attributes.case);
        cases.push(objects.attributes.case);
    }
    cases.sort();
    assert_eq!(cases, [Some(Case::Nomn), Some(Case::Accs)]);
}

#[test]
fn test_number_agreement() {
    let parser = sample_parser();
    let mut worker = parser.new_worker();

    worker.reset_sentence("В больничном дворе стоит дом, покрытый снегом.");
    assert_eq!(worker.parse_complete("sentence").unwrap(), 2);

    // The singular verb only agrees with the genitive singular reading of
    // "дома", which the plural participle then rejects.
    worker.reset_sentence("В больничном дворе стоит дома, покрытые снегом.");
    assert_eq!(worker.parse_complete("sentence").unwrap(), 0);

    worker.reset_sentence("В больничном дворе стоят дом, покрытый снегом.");
    assert_eq!(worker.parse_complete("sentence").unwrap(), 0);
}

/// `number=plur`を継承した場合だけ列挙の選択肢が使われる
#[test]
fn test_guard_gating() {
    let parser = sample_parser();
    let mut worker = parser.new_worker();
    worker.reset_sentence("столы, стулья и окна");
    let len = worker.len_char();

    let mut plural = Features::default();
    plural.set(Feature::Number(Number::Plur));
    worker
        .parse_with("extended_objects", 0, plural)
        .unwrap();
    let lists: Vec<_> = worker
        .derivation_iter()
        .filter(|d| d.range_char().end == len)
        .map(|d| d.attributes())
        .collect();
    assert_eq!(lists.len(), 2);
    // The guard only gates the list alternatives; it is not exported.
    assert!(lists.iter().all(|a| a.number.is_none()));
    let mut cases: Vec<_> = lists.iter().map(|a| a.case).collect();
    cases.sort();
    assert_eq!(cases, [Some(Case::Nomn), Some(Case::Accs)]);

    let mut singular = Features::default();
    singular.set(Feature::Number(Number::Sing));
    assert_eq!(
        worker.parse_with("extended_objects", 0, singular).unwrap(),
        2
    );
    assert!(worker.derivation_iter().all(|d| d.surface() == "столы"));
}

#[test]
fn test_prefix_and_complete() {
    let parser = sample_parser();
    let mut worker = parser.new_worker();

    worker.reset_sentence("  В больничном дворе стоят дома, покрытые снегом.  ");
    assert_eq!(worker.parse_complete("sentence").unwrap(), 2);
    assert_eq!(worker.parse("sentence", 0).unwrap(), 0);

    worker.reset_sentence("В больничном дворе стоят дома, покрытые снегом. И ещё");
    assert_eq!(worker.parse("sentence", 0).unwrap(), 2);
    assert_eq!(worker.parse_complete("sentence").unwrap(), 0);
}

#[test]
fn test_offset_start() {
    let parser = sample_parser();
    let mut worker = parser.new_worker();

    worker.reset_sentence("Я видел окна и столы");
    assert_eq!(worker.parse("extended_objects", 0).unwrap(), 0);
    let n = worker.parse("extended_objects", 8).unwrap();
    assert!(n > 0);
    assert!(
        worker
            .derivation_iter()
            .any(|d| d.surface() == "окна и столы")
    );
}

#[test]
fn test_multi_word_entry() {
    let dict = DictionaryBuilder::from_text(LEXICON).unwrap();
    let grammar = Grammar::from_rules([("clause", "{pos=advb} {pos=verb !number}")]).unwrap();
    let parser = Parser::new(dict, grammar);
    let mut worker = parser.new_worker();

    worker.reset_sentence("По крайней мере стоят");
    assert_eq!(worker.parse_complete("clause").unwrap(), 1);
    let d = worker.derivation(0);
    assert_eq!(d.attributes().number, Some(Number::Plur));
    match d.children().next().unwrap() {
        Child::Word(w) => {
            assert_eq!(w.surface(), "По крайней мере");
            assert_eq!(w.range_char(), 0..15);
        }
        Child::Phrase(p) => panic!("unexpected phrase {p:?}"),
    }
}

#[test]
fn test_parser_is_shared_across_threads() {
    let parser = sample_parser();
    let handles: Vec<_> = [
        "В больничном дворе стоят дома, покрытые снегом.",
        "В больничном дворе стоит дом, покрытый снегом.",
    ]
    .into_iter()
    .map(|input| {
        let parser = parser.clone();
        std::thread::spawn(move || {
            let mut worker = parser.new_worker();
            worker.reset_sentence(input);
            worker.parse_complete("sentence").unwrap();
            worker.to_matches()
        })
    })
    .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 2);
    }
}
