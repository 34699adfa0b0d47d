use goo::core::output;

fn main() {
    if let Err(e) = goo::run() {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
