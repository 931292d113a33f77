//! サンプリング結果の集計と出力

use anyhow::{Context, Result, anyhow};
use rgo_playout::pattern::Feature;
use rgo_playout::{Color, EloConfig, Point, PriorMap};
use serde::Serialize;

/// 着手ごとの出現回数
#[derive(Debug, Clone)]
pub struct MoveHistogram {
    size: usize,
    counts: Vec<u32>,
    passes: u32,
    samples: u32,
}

/// 1着手分の集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramEntry {
    pub point: String,
    pub count: u32,
    pub frequency: f64,
}

/// 1交点分の事前分布
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorEntry {
    pub point: String,
    pub value: f64,
    pub playouts: u32,
}

impl MoveHistogram {
    pub fn new(size: usize) -> MoveHistogram {
        MoveHistogram {
            size,
            counts: vec![0; size * size],
            passes: 0,
            samples: 0,
        }
    }

    pub fn record(&mut self, point: Point) {
        self.samples += 1;
        if point.is_pass() {
            self.passes += 1;
        } else {
            self.counts[point.index(self.size)] += 1;
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// 出現回数の多い順（同数なら行優先順）
    pub fn entries(&self) -> Vec<HistogramEntry> {
        let mut entries: Vec<(Point, u32)> = self
            .counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| (Point::from_index(i, self.size), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let samples = f64::from(self.samples.max(1));
        entries
            .into_iter()
            .map(|(point, count)| HistogramEntry {
                point: point.to_gtp(self.size),
                count,
                frequency: f64::from(count) / samples,
            })
            .collect()
    }
}

/// 事前分布を値の大きい順に並べる
pub fn prior_entries(map: &PriorMap, size: usize) -> Vec<PriorEntry> {
    let mut entries: Vec<PriorEntry> = map
        .iter()
        .map(|(point, stats)| PriorEntry {
            point: point.to_gtp(size),
            value: stats.value,
            playouts: stats.playouts,
        })
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}

/// `--json` で出力するレポート
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub policy: EloConfig,
    pub size: usize,
    pub to_play: Color,
    pub seed: u64,
    pub samples: u32,
    pub passes: u32,
    pub moves: Vec<HistogramEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priors: Option<Vec<PriorEntry>>,
}

impl SampleReport {
    /// テキスト形式（上位 `top` 件）
    pub fn render_text(&self, top: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} samples for {} on {}x{} (seed {}), {} passes\n",
            self.samples,
            self.to_play.to_char(),
            self.size,
            self.size,
            self.seed,
            self.passes
        ));
        for entry in self.moves.iter().take(top) {
            out.push_str(&format!(
                "{:>5} {:>8} {:>7.3}%\n",
                entry.point,
                entry.count,
                entry.frequency * 100.0
            ));
        }
        if let Some(priors) = &self.priors {
            out.push_str("priors:\n");
            for entry in priors.iter().take(top) {
                out.push_str(&format!("{:>5} {:.5}\n", entry.point, entry.value));
            }
        }
        out
    }
}

/// `D4=capture:0` 形式の注釈を解釈する
pub fn parse_annotation(spec: &str, size: usize) -> Result<(Point, Feature)> {
    let (point, feature) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("expected <point>=<feature>, got `{spec}`"))?;
    let point = Point::from_gtp(point.trim(), size)
        .filter(|p| !p.is_pass())
        .ok_or_else(|| anyhow!("bad point `{point}` for {size}x{size}"))?;
    let feature: Feature = feature
        .trim()
        .parse()
        .map_err(|e: String| anyhow!(e))
        .with_context(|| format!("bad feature in `{spec}`"))?;
    Ok((point, feature))
}
