#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<String>, String)| {
    for source in data.0 {
        let pattern = match pathway::Pattern::compile(&source) {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };

        if let Some(values) = pattern.find(&data.1) {
            assert_eq!(values.len(), pattern.keys().len());
        }
    }

    if let Ok(base) = pathway::BasePattern::new(&data.1) {
        let _ = base.normalize(&data.1);
    }
});
