//! プレイアウト方策のサンプリングツール
//!
//! 盤面図を読み込み、方策で指定回数だけ着手を選んで分布を集計する。
//!
//! 使い方:
//!   # 直前手 D5 の周囲に偏るかを見る
//!   playout_sample --policy gammafile=data/patterns.gamma --size 9 --last D5 --samples 100000
//!
//!   # 盤面図から読み込み、事前分布も出力
//!   playout_sample --policy gammafile=data/patterns.gamma --board pos.txt --assess 20 --json
//!
//! 盤面図は `X` = 黒, `O` = 白, `.` = 空点 を1行1段で並べたもの。
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rgo_playout::{
    AnnotationMatcher, Board, Color, EloPolicy, GridBoard, Move, Point, PriorMap, RolloutFields,
};
use tools::sampling::{MoveHistogram, SampleReport, parse_annotation, prior_entries};

#[derive(Parser, Debug)]
#[command(name = "playout_sample")]
#[command(about = "ELO-gamma プレイアウト方策の着手分布を集計する")]
struct Cli {
    /// 方策オプション（例: gammafile=patterns.gamma:precisesa）
    #[arg(long, default_value = "")]
    policy: String,

    /// 盤面図ファイル（省略時は空の盤）
    #[arg(long)]
    board: Option<PathBuf>,

    /// 空の盤の路数
    #[arg(long, default_value_t = 9)]
    size: usize,

    /// 手番（black / white）
    #[arg(long, default_value = "black")]
    to_play: Color,

    /// 相手の直前手（GTP 座標）
    #[arg(long)]
    last: Option<String>,

    /// コウで手番側が打てない点（GTP 座標）
    #[arg(long)]
    ko: Option<String>,

    /// 交点の特徴量注釈（例: D4=capture:0、複数指定可）
    #[arg(long = "annotate")]
    annotations: Vec<String>,

    /// サンプル数
    #[arg(long, default_value_t = 10_000)]
    samples: u32,

    /// 乱数シード
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// 事前分布も計算する（仮想対局数）
    #[arg(long)]
    assess: Option<u32>,

    /// テキスト出力の表示件数
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// JSON出力モード
    #[arg(long)]
    json: bool,
}

fn parse_point(s: &str, size: usize) -> Result<Point> {
    match Point::from_gtp(s, size) {
        Some(p) if !p.is_pass() => Ok(p),
        _ => bail!("bad coordinate `{s}` for {size}x{size}"),
    }
}

fn load_board(cli: &Cli) -> Result<GridBoard> {
    let mut board = match &cli.board {
        Some(path) => {
            let diagram = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read board diagram {}", path.display()))?;
            GridBoard::from_diagram(&diagram)
                .with_context(|| format!("bad board diagram {}", path.display()))?
        }
        None => {
            if !(1..=rgo_playout::types::MAX_BOARD_SIZE).contains(&cli.size) {
                bail!("unsupported board size {}", cli.size);
            }
            GridBoard::new(cli.size)
        }
    };
    let size = board.size();

    if let Some(last) = &cli.last {
        let point = parse_point(last, size)?;
        board.set_last_move(Some(Move::new(point, !cli.to_play)));
    }
    if let Some(ko) = &cli.ko {
        let point = parse_point(ko, size)?;
        board.set_ko(Some(Move::new(point, cli.to_play)));
    }
    for spec in &cli.annotations {
        let (point, feature) = parse_annotation(spec, size)?;
        board.annotate(point, feature);
    }
    Ok(board)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    let cli = Cli::parse();

    let board = load_board(&cli)?;
    let size = board.size();
    let policy = EloPolicy::new(&cli.policy, AnnotationMatcher)
        .with_context(|| format!("cannot initialise policy `{}`", cli.policy))?;
    log::info!(
        "sampling {} moves for {:?} on {size}x{size} (seed {})",
        cli.samples,
        cli.to_play,
        cli.seed
    );

    let sampler = policy.sampler::<GridBoard>();
    let mut fields = RolloutFields::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(cli.seed);
    let mut histogram = MoveHistogram::new(size);
    for _ in 0..cli.samples {
        histogram.record(sampler.choose(&board, cli.to_play, &mut fields, &mut rng)?);
    }

    let priors = match cli.assess {
        Some(games) => {
            let mut map = PriorMap::new(size, cli.to_play);
            map.consider_free_points(&board);
            let forwarded = policy.assess(&board, cli.to_play, &mut map, games)?;
            log::info!("assessed {forwarded} points");
            Some(prior_entries(&map, size))
        }
        None => None,
    };

    let report = SampleReport {
        policy: policy.config().clone(),
        size,
        to_play: cli.to_play,
        seed: cli.seed,
        samples: histogram.samples(),
        passes: histogram.passes(),
        moves: histogram.entries(),
        priors,
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(cli.top));
    }

    policy.shutdown();
    Ok(())
}
