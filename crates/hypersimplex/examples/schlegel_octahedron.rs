//! Schlegel diagrams of the octahedron Δ(4,2) for every facet pair.
//!
//! Runs the build on a worker thread and polls it, then prints the planar
//! diagram of each facet pair once projected onto the larger facet and once
//! onto the smaller one.

use std::thread;
use std::time::Duration;

use hypersimplex::prelude::*;

fn main() -> Result<(), HypersimplexError> {
    let mut job = BuildJob::spawn(4, 2, Box::new(NativeService::default()), PipelineCfg::default());
    let mut polls = 0usize;
    while let BuildStatus::Pending = job.poll() {
        polls += 1;
        thread::sleep(Duration::from_millis(2));
    }
    println!("ready after {polls} polls");
    let rep = job.wait()?;

    let whole = rep.subgroups().len() - 1;
    let e = rep.null_space(whole, None)?;
    for facet in 0..rep.hypersimplex().d() {
        for larger in [true, false] {
            let cfg = SchlegelCfg {
                project_to_larger: larger,
                ..SchlegelCfg::default()
            };
            let diagram = rep.schlegel_with(&e, facet, &cfg)?;
            println!("facet {facet} larger={larger} plane={:?}", diagram.image_facet());
            for (i, p) in diagram.points().iter().enumerate() {
                println!("  v{i} = ({:+.4}, {:+.4})", p[0], p[1]);
            }
        }
    }
    Ok(())
}
