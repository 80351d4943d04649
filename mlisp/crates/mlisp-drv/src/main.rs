fn main() {
    env_logger::init();
    if let Err(e) = mlisp_drv::main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
