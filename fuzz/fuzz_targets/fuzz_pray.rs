#![no_main]
use libfuzzer_sys::fuzz_target;
use prayer::{Blocks, PrayFile};

fuzz_target!(|data: &[u8]| {
    let Ok(file) = PrayFile::from_slice(data) else {
        // The lazy walker must agree with the eager decoder
        if let Ok(blocks) = Blocks::from_slice(data) {
            assert!(blocks.into_iter().any(|x| x.is_err()));
        }
        return;
    };

    for block in &file {
        let _ = block.decode_body();
    }

    // Whatever decodes must survive a rewrite
    for compress in [false, true] {
        let out = file.to_bytes(compress).unwrap();
        let decoded = PrayFile::from_slice(&out).unwrap();
        assert_eq!(decoded.len(), file.len());
        for (a, b) in decoded.iter().zip(file.iter()) {
            assert_eq!(a.prefix(), b.prefix());
            assert_eq!(a.name(), b.name());
            assert_eq!(a.body(), b.body());
        }
    }
});
