// benches/transform_bench.rs
//! Benchmarks for block tree to Markdown rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notion_toolset::model::TextBlock;
use notion_toolset::{Block, BlockId, Markdown, MarkdownConfig, Page, PageId, Parent, RichTextItem};

struct Tree {
    top: Vec<Block>,
    children: Vec<(BlockId, Vec<Block>)>,
    next_id: u32,
}

impl Tree {
    fn build(depth: usize, breadth: usize) -> Self {
        let mut tree = Tree {
            top: Vec::new(),
            children: Vec::new(),
            next_id: 1,
        };
        tree.top = tree.level(depth, breadth);
        tree
    }

    fn id(&mut self) -> BlockId {
        self.next_id += 1;
        BlockId::parse(&format!("{:032x}", self.next_id)).unwrap()
    }

    fn level(&mut self, depth: usize, breadth: usize) -> Vec<Block> {
        (0..breadth)
            .map(|i| {
                let id = self.id();
                let text = vec![
                    RichTextItem::plain_text("item "),
                    RichTextItem::plain_text(&i.to_string()).bold(),
                ];
                if depth == 0 {
                    return Block::Paragraph(TextBlock::new(id, text));
                }
                let nested = self.level(depth - 1, breadth);
                self.children.push((id.clone(), nested));
                Block::BulletedListItem(TextBlock::new(id, text).with_children())
            })
            .collect()
    }

    fn markdown(&self) -> Markdown {
        let page = Page::new(PageId::new_v4(), Parent::Workspace);
        self.children.iter().fold(
            Markdown::new(MarkdownConfig::single_page(), page, self.top.clone()),
            |markdown, (id, blocks)| markdown.with_resolved_children(id.clone(), blocks.clone()),
        )
    }
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for (depth, breadth, name) in [(2, 4, "small"), (3, 5, "medium"), (4, 6, "large")] {
        let tree = Tree::build(depth, breadth);
        group.bench_with_input(BenchmarkId::new("nested_lists", name), &tree, |b, tree| {
            b.iter_batched(
                || tree.markdown(),
                |markdown| black_box(markdown.transform()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
