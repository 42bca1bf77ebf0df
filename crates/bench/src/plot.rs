use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::errors::BenchError;
use crate::harness::BenchRecord;
use crate::report::BenchResults;

const RPC_LABEL: &str = "gRPC Microservice";
const REST_LABEL: &str = "REST Monolith";

struct Panel<'a> {
    title: &'static str,
    y_desc: &'static str,
    rpc: &'a [BenchRecord],
    rest: &'a [BenchRecord],
    metric: fn(&BenchRecord) -> f64,
}

fn latency(r: &BenchRecord) -> f64 { r.avg_latency_ms }
fn throughput(r: &BenchRecord) -> f64 { r.throughput_rps }

fn plot_err<E: std::fmt::Display>(e: E) -> BenchError {
    BenchError::Plot(e.to_string())
}

fn points(rows: &[BenchRecord], metric: fn(&BenchRecord) -> f64) -> Vec<(f64, f64)> {
    rows.iter().map(|r| (r.users as f64, metric(r))).collect()
}

/// Render the 2x2 comparison chart (write/read x latency/throughput) as SVG.
pub fn render_svg(results: &BenchResults, path: &Path) -> Result<(), BenchError> {
    let root = SVGBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let root = root
        .titled("Pharmacy Inventory - gRPC Microservice vs REST Monolith", ("sans-serif", 26))
        .map_err(plot_err)?;

    let panels = [
        Panel { title: "Write Latency (Add Drug)", y_desc: "Avg Latency (ms)", rpc: &results.grpc_write, rest: &results.rest_write, metric: latency },
        Panel { title: "Write Throughput (Add Drug)", y_desc: "Throughput (req/s)", rpc: &results.grpc_write, rest: &results.rest_write, metric: throughput },
        Panel { title: "Read Latency (List Drugs)", y_desc: "Avg Latency (ms)", rpc: &results.grpc_read, rest: &results.rest_read, metric: latency },
        Panel { title: "Read Throughput (List Drugs)", y_desc: "Throughput (req/s)", rpc: &results.grpc_read, rest: &results.rest_read, metric: throughput },
    ];

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels.iter()) {
        draw_panel(area, panel)?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, p: &Panel<'_>) -> Result<(), BenchError> {
    let rpc = points(p.rpc, p.metric);
    let rest = points(p.rest, p.metric);

    let x_max = rpc.iter().chain(rest.iter()).map(|(x, _)| *x).fold(1.0, f64::max) * 1.05;
    let y_max = rpc.iter().chain(rest.iter()).map(|(_, y)| *y).fold(1.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(p.title, ("sans-serif", 18))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Concurrent Users")
        .y_desc(p.y_desc)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(rpc.clone(), BLUE.stroke_width(2)))
        .map_err(plot_err)?
        .label(RPC_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(rpc.iter().map(|&pt| Circle::new(pt, 4, BLUE.filled())))
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(rest.clone(), RED.stroke_width(2)))
        .map_err(plot_err)?
        .label(REST_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(rest.iter().map(|&pt| TriangleMarker::new(pt, 5, RED.filled())))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    Ok(())
}
