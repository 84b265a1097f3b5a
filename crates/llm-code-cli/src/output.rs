//! Console rendering for extracted code.

use llm_code_templates::CodeBlock;

/// Render a code block, optionally with right-aligned line numbers.
pub fn format_code(block: &CodeBlock, line_numbers: bool) -> String {
    if !line_numbers {
        return block.code.clone();
    }
    let width = block.code.lines().count().to_string().len();
    block
        .code
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let n = i + 1;
            format!("{n:>width$} | {line}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_code(block: &CodeBlock, line_numbers: bool) {
    println!("{}", format_code(block, line_numbers));
}

/// Fallback when the reply carried no fenced code block.
pub fn print_no_code(reply: &str) {
    println!("No code found in reply:\n\n{reply}");
}
