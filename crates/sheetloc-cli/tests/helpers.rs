use std::path::Path;

/// Panic with the head of `haystack` when `needle` is missing.
pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!(
        "{}\n--- needle ---\n{}\n--- head(10) ---\n{}",
        context_msg, needle, head
    );
}

/// Fail when any ANSI escape made it into plain output.
pub fn assert_no_ansi(s: &str, context_msg: &str) {
    if let Some(pos) = s.bytes().position(|b| b == 0x1B) {
        let sample = s.lines().take(8).collect::<Vec<_>>().join("\n");
        panic!(
            "{}\nANSI escape at byte {}\n--- sample (first 8 lines) ---\n{}",
            context_msg, pos, sample
        );
    }
}

pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(path, content).expect("write fixture");
}

/// A locales tree and a sheet CSV with one updatable row and one orphan.
pub fn sync_fixture(root: &Path) {
    write_file(
        root,
        "locales/en/common.json",
        r#"{"hello":"Hello","apple_one":"Apple"}"#,
    );
    write_file(root, "locales/ko/common.json", "{\n  \"hello\": \"안녕\"\n}\n");
    write_file(
        root,
        "sheet.csv",
        "네임스페이스,번역 키,유형,사용여부,한국어,영어,생성일\n\
         common,hello,,TRUE,,Hi there,2020-01-01 00:00:00\n\
         common,gone,,TRUE,사라짐,Gone,2020-01-01 00:00:00\n",
    );
}
