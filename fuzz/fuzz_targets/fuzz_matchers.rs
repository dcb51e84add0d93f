#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shingle_bench::matcher::{AhoCorasick, CommentzWalter, HashParams, Matcher, RabinKarp};
use shingle_bench::utils::{DuplicatePolicy, PatternSet};

#[derive(Arbitrary, Debug)]
struct Input {
    query: Vec<u8>,
    text: Vec<u8>,
    k: u8,
    keep: bool,
    small_modulus: bool,
}

fuzz_target!(|input: Input| {
    // Cross-check the engines: they must report identical occurrences
    let k = (input.k % 16) as usize + 1;
    let policy = if input.keep {
        DuplicatePolicy::Keep
    } else {
        DuplicatePolicy::Collapse
    };
    let Ok(patterns) = PatternSet::from_text(&input.query, k, policy) else {
        return;
    };

    let mut expected = AhoCorasick::new(&patterns).find_all(&input.text);
    expected.sort();

    let params = if input.small_modulus {
        HashParams { base: 3, modulus: 13 }
    } else {
        HashParams::default()
    };
    let mut rk = RabinKarp::with_params(&patterns, params).unwrap().find_all(&input.text);
    rk.sort();
    assert_eq!(rk, expected);

    if let Ok(cw) = CommentzWalter::new(&patterns) {
        let mut found = cw.find_all(&input.text);
        found.sort();
        assert_eq!(found, expected);
    }
});
