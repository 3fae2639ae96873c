#![no_main]
use libfuzzer_sys::fuzz_target;
use prayer::TagList;

fuzz_target!(|data: &[u8]| {
    let Ok(tags) = TagList::from_slice(data) else {
        return;
    };

    let out = tags.to_bytes().unwrap();
    assert_eq!(TagList::from_slice(&out).unwrap(), tags);
});
