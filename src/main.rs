use newtonc::compiler::driver::compile;

fn main() {
    std::process::exit(compile(std::env::args().collect()));
}
