fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match wikiroute_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[wikiroute-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = wikiroute_core::runtime::run_with_options(options) {
        eprintln!("[wikiroute-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
