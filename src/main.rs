fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    template_tool::run_app()
}
