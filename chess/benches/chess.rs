use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kingfall::{
    engine::{self, Engine},
    legal,
    moves::{self, Move},
    Board, Color,
};

const BOARDS: [(&str, &str); 7] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "sicilian",
        "r1b1k2r/2qnbppp/p2ppn2/1p4B1/3NPPP1/2N2Q2/PPP4P/2KR1B1R w kq - 0 11",
    ),
    (
        "middle",
        "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21",
    ),
    (
        "open_position",
        "4r1k1/3R1ppp/8/5P2/p7/6PP/4pK2/1rN1B3 w - - 4 43",
    ),
    ("castling", "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"),
    ("queen", "6K1/8/8/1k3q2/3Q4/8/8/8 w - - 0 1"),
    (
        "max",
        "3Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/NR4Q1/kN1BB1K1 w - - 0 1",
    ),
];

fn boards() -> impl Iterator<Item = (&'static str, Board, Color)> {
    BOARDS.iter().map(|&(name, fen)| {
        let (board, side) = Board::from_fen(fen).unwrap();
        (name, board, side)
    })
}

fn bench_destinations(c: &mut Criterion) {
    let mut group = c.benchmark_group("destinations");
    for (name, board, side) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| {
                for p in board.pieces_of(side) {
                    black_box(legal::destinations(p, &board).len());
                }
            })
        });
    }
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");
    for (name, board, side) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine::legal_moves(&board, side).len()))
        });
    }
}

fn bench_apply_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_move");
    for (name, board, side) in boards() {
        let all = engine::legal_moves(&board, side);
        group.bench_function(name, |b| {
            b.iter(|| {
                for (p, dst) in &all {
                    black_box(moves::apply_move(p, *dst, &board).board.len());
                }
            })
        });
    }
}

fn bench_make_checked(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_checked");
    for (name, board, side) in boards() {
        let all: Vec<_> = engine::legal_moves(&board, side)
            .into_iter()
            .map(|(p, dst)| Move::new(p.coord, dst))
            .collect();
        group.bench_function(name, |b| {
            b.iter(|| {
                for mv in &all {
                    black_box(mv.make(&board, side).map(|a| a.board.len()).unwrap_or(0));
                }
            })
        });
    }
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(10);
    for (name, board, side) in boards() {
        for depth in 1..=2 {
            group.bench_function(format!("{}/depth{}", name, depth), |b| {
                let mut engine = Engine::with_seed(1);
                b.iter(|| black_box(engine.pick(&board, side, depth)))
            });
        }
    }
}

criterion_group!(
    chess,
    bench_destinations,
    bench_legal_moves,
    bench_apply_move,
    bench_make_checked,
    bench_engine,
);

criterion_main!(chess);
