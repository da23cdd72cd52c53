use super::*;

fn rebuild(text: &str) -> String {
    segment(text).map(|t| t.text).collect()
}

#[test]
fn concatenation_reproduces_input() {
    for text in [
        "",
        " ",
        "\n",
        "word",
        "  leading and trailing  ",
        "A\nB\nC",
        "\"Sayın Yargıç Erkan Cantay!\". Yargıç içeri girdiğinde…\n\nAvukatı dürttüğünde",
        "tabs\tand\r\nwindows\u{a0}nbsp",
        "\n\n \n",
    ] {
        assert_eq!(rebuild(text), text, "input {text:?}");
    }
}

#[test]
fn empty_input_yields_nothing() {
    assert_eq!(segment("").count(), 0);
}

#[test]
fn words_and_separators_alternate() {
    let tokens: Vec<_> = segment("one  two\nthree").collect();
    let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();
    assert_eq!(
        kinds,
        vec![
            (TokenKind::Word, "one"),
            (TokenKind::Separator, "  "),
            (TokenKind::Word, "two"),
            (TokenKind::Separator, "\n"),
            (TokenKind::Word, "three"),
        ]
    );
}

#[test]
fn newlines_are_split_from_surrounding_spaces() {
    let texts: Vec<_> = segment("a \n\n b").map(|t| t.text).collect();
    assert_eq!(texts, vec!["a", " ", "\n", "\n", " ", "b"]);
    assert!(segment("\n").next().unwrap().is_line_break());
}

#[test]
fn sequence_is_restartable() {
    let seq = segment("Bir süre sessizlikten sonra");
    let first: Vec<_> = seq.clone().collect();
    let second: Vec<_> = seq.collect();
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|t| t.is_word()).count(), 4);
}
