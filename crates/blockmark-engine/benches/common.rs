// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use blockmark_engine::models::{Block, BlockType, ImageData, Mark, MarkType};

#[allow(dead_code)]
pub fn generate_paragraph(words: usize) -> String {
    let base = ["lorem", "ipsum", "dolor", "sit", "amet", "café", "naïve"];
    (0..words)
        .map(|i| base[i % base.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// A paragraph with `marks` strong spans spread across it
#[allow(dead_code)]
pub fn generate_marked_block(words: usize, marks: usize) -> Block {
    let content = generate_paragraph(words);
    let len = content.chars().count();
    let step = (len / marks.max(1)).max(2);
    let marks = (0..marks)
        .map(|i| i * step)
        .filter(|start| start + 1 < len)
        .map(|start| {
            let end = (start + step / 2).max(start + 1).min(len);
            Mark::new(MarkType::Strong, start..end)
        })
        .collect();
    Block::text("bench", BlockType::Paragraph, content).with_marks(marks)
}

/// A mixed document of `sections` heading + paragraph + list + image runs
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    for section in 0..sections {
        blocks.push(Block::text(
            format!("h{section}"),
            BlockType::Heading2,
            format!("Section {section}"),
        ));
        blocks.push(Block::text(
            format!("p{section}"),
            BlockType::Paragraph,
            generate_paragraph(40),
        ));
        for item in 0..3 {
            blocks.push(Block::text(
                format!("l{section}-{item}"),
                BlockType::BulletList,
                format!("Item {item}"),
            ));
        }
        if section % 3 == 0 {
            blocks.push(Block::image(
                format!("i{section}"),
                ImageData::new(format!("image-{section}"), "Figure"),
            ));
        }
    }
    blocks
}
