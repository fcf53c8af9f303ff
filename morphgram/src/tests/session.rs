use std::fs;

use tempfile::tempdir;

use crate::dictionary::DictionaryBuilder;
use crate::errors::MorphgramError;
use crate::grammar::Grammar;
use crate::session::Session;

const LEXICON: &str = include_str!("./resources/lexicon.txt");
const GRAMMAR: &str = include_str!("./resources/grammar.txt");

const SENTENCE: &str = "В больничном дворе стоят дома, покрытые снегом.";

fn session() -> Session {
    Session::new(Grammar::from_reader(GRAMMAR.as_bytes()).unwrap())
}

#[test]
fn test_init_parse_finalize() {
    let dir = tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.txt");
    let db_path = dir.path().join("morph.db");
    fs::write(&lexicon_path, LEXICON).unwrap();
    DictionaryBuilder::build_file(&lexicon_path, &db_path).unwrap();

    let mut session = session();
    assert!(!session.is_loaded());
    session.init(&db_path).unwrap();
    assert!(session.is_loaded());

    let matches = session.parse(SENTENCE, "sentence", 0).unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.text == SENTENCE));

    // Re-initializing replaces the loaded dictionary.
    session.init(&db_path).unwrap();
    assert_eq!(session.parse(SENTENCE, "sentence", 0).unwrap().len(), 2);

    session.finalize();
    assert!(!session.is_loaded());
    assert!(matches!(
        session.parse(SENTENCE, "sentence", 0),
        Err(MorphgramError::InvalidState(_))
    ));
    session.finalize();
}

/// 壊れた辞書ファイルでは何も読み込まれず、その後の照合は拒否される
#[test]
fn test_init_with_corrupt_file() {
    let dir = tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.txt");
    let db_path = dir.path().join("morph.db");
    fs::write(&lexicon_path, LEXICON).unwrap();
    DictionaryBuilder::build_file(&lexicon_path, &db_path).unwrap();

    let mut bytes = fs::read(&db_path).unwrap();
    bytes[..4].copy_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());
    let corrupt_path = dir.path().join("corrupt.db");
    fs::write(&corrupt_path, &bytes).unwrap();

    let mut session = session();
    session.init(&db_path).unwrap();

    match session.init(&corrupt_path) {
        Err(MorphgramError::BadMagic { expected, found }) => {
            assert_eq!(expected, 0xFC12_90C8);
            assert_eq!(found, 0xDEAD_BEEF);
        }
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
    assert!(!session.is_loaded());
    assert!(matches!(
        session.parse(SENTENCE, "sentence", 0),
        Err(MorphgramError::InvalidState(_))
    ));
}

#[test]
fn test_init_with_missing_file() {
    let dir = tempdir().unwrap();
    let mut session = session();
    assert!(matches!(
        session.init(dir.path().join("missing.db")),
        Err(MorphgramError::StdIo(_))
    ));
    assert!(!session.is_loaded());
}

#[test]
fn test_options_apply_on_init() {
    let dir = tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.txt");
    let db_path = dir.path().join("morph.db");
    fs::write(&lexicon_path, LEXICON).unwrap();
    DictionaryBuilder::build_file(&lexicon_path, &db_path).unwrap();

    let mut session = session().max_derivations(1);
    session.init(&db_path).unwrap();
    assert_eq!(session.parse("дома", "extended_object", 0).unwrap().len(), 1);
    assert_eq!(session.parse("по крайней мере", "idiom", 0).unwrap().len(), 2);

    let mut session = session.separator("");
    session.init(&db_path).unwrap();
    assert_eq!(session.parse("по крайней мере", "idiom", 0).unwrap().len(), 1);
}
