#[cfg(test)]
#[ctor::ctor]
fn init() {
    use log::LevelFilter;
    use log4rs::append::console::ConsoleAppender;
    use log4rs::config::{Appender, Config, Root};

    let console = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(LevelFilter::Debug))
        .unwrap();
    log4rs::init_config(config).unwrap();
}

pub fn log_header(name: &str, content: &[u8]) {
    fn get_byte_array(bytes: &[u8]) -> Vec<String> {
        bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
    }
    log::debug!("{} {:?}", name, get_byte_array(content));
}
