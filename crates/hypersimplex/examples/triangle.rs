//! Walk Δ(3,1) through the whole pipeline and print each stage.
//!
//! The triangle is the smallest hypersimplex: three vertices, one edge class
//! under S3, an equilateral embedding in the plane and a one-dimensional
//! Schlegel diagram.

use hypersimplex::prelude::*;

fn main() -> Result<(), HypersimplexError> {
    let rep = Representer::build(
        3,
        1,
        Box::new(NativeService::default()),
        PipelineCfg::default(),
        &CancelToken::new(),
    )?;
    println!("group {} (order {})", rep.group().handle().name, rep.group().handle().order);
    for s in rep.subgroups() {
        println!(
            "  transitive #{} = subgroup {} {} order={} classes={}",
            s.position, s.index, s.name, s.order, s.class_count
        );
    }

    let whole = rep.subgroups().len() - 1;
    let gi = rep.gi_matrix(whole)?;
    println!("weights {:?}", gi.weights());
    println!("matrix {}", gi.matrix());

    let e = rep.null_space(whole, None)?;
    println!("spectrum {:?}", e.spectrum());
    for (i, p) in e.points().iter().enumerate() {
        println!("  v{i} = {:?}", p.as_slice());
    }

    let diagram = rep.schlegel(&e, 0)?;
    for (i, p) in diagram.points().iter().enumerate() {
        println!("  schlegel v{i} = {:?}", p.as_slice());
    }
    Ok(())
}
