use std::io::Write;

/// The process environment commands write to and exit through.
pub trait Host: Send + Sync {
    /// Normal output, such as stdout.
    fn output(&mut self) -> impl Write;

    /// Diagnostics, such as stderr.
    fn error(&mut self) -> impl Write;

    /// Terminate the process. Hosts used in tests may just record the code.
    fn exit(&mut self, code: i32);
}

/// Host capturing output in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
