// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_chapter(sections: usize) -> String {
    let mut content = String::from("# Chapter\n\n");
    for section in 0..sections {
        content.push_str(&format!(
            "## Section {section}\n\nSome paragraph content with a few sentences.\n\n"
        ));
        content.push_str(&format!(
            "%%\ncode: https://github.com/example/book/tree/main/s{section}\n%%\n\n"
        ));
        content.push_str(&format!(
            "```python\n# s{section}/example.py\ndef example():\n    print(\"Hello\")\n```\n\n"
        ));
        content.push_str("```text\nHello\n```\n\n");
    }
    content
}
