use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lifeline_layout::ast::{
    Block, Expr, ExpressionStatement, Foreach, Function, If, Invocation, Node, VisibleEndpoint,
    While,
};
use lifeline_layout::config::SizingConfig;
use lifeline_layout::layout::{GlyphTable, size_tree};
use lifeline_layout::source::SourceGen;
use std::hint::black_box;

fn call(idx: usize, endpoints: usize) -> Node {
    let invocation = if endpoints > 0 && idx % 3 == 0 {
        Invocation::action(
            &format!("ep{}", idx % endpoints),
            "post",
            vec![Expr::literal("\"/resource/with/a/fairly/long/path\""), Expr::identifier("body")],
        )
    } else {
        Invocation::call(&format!("helper{idx}"), vec![Expr::identifier("value")])
    };
    Node::ExpressionStatement(ExpressionStatement::new(Expr::Invocation(invocation)))
}

/// A function with `statements` rows spread over nested loops and branches.
fn synthetic_function(statements: usize, endpoints: usize) -> Node {
    let mut body = Vec::new();
    let mut idx = 0;
    while idx < statements {
        let chunk: Vec<Node> = (idx..(idx + 4).min(statements))
            .map(|i| call(i, endpoints))
            .collect();
        idx += chunk.len();
        body.push(match (idx / 4) % 3 {
            0 => Node::While(While {
                condition: Expr::identifier("running"),
                body: Block::new(chunk),
                view_state: Default::default(),
            }),
            1 => Node::Foreach(Foreach {
                variables: vec!["item".to_string()],
                collection: Expr::identifier("items"),
                body: Block::new(chunk),
                view_state: Default::default(),
            }),
            _ => Node::If(If {
                condition: Expr::identifier("ready"),
                body: Block::new(chunk),
                else_statement: Some(Box::new(Node::Block(Block::new(vec![call(0, 0)])))),
                view_state: Default::default(),
            }),
        });
    }
    let endpoints = (0..endpoints)
        .map(|i| VisibleEndpoint::new(&format!("ep{i}")))
        .collect();
    Node::Function(Function::new("bench", endpoints, body))
}

fn bench_sizing(c: &mut Criterion) {
    let config = SizingConfig::default();
    let metrics = GlyphTable::new(config.text.font_size);
    let mut group = c.benchmark_group("size_tree");
    for (statements, endpoints) in [(16, 2), (256, 4), (4096, 8)] {
        let tree = synthetic_function(statements, endpoints);
        group.bench_with_input(
            BenchmarkId::from_parameter(statements),
            &tree,
            |b, tree| {
                b.iter(|| {
                    let mut tree = tree.clone();
                    size_tree(&mut tree, &config, &metrics, &SourceGen);
                    black_box(tree);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sizing);
criterion_main!(benches);
