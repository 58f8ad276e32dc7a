use spatial_sir::runner::run_with_args;

fn main() {
    if let Err(e) = run_with_args(|_engine, _args| Ok(())) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
