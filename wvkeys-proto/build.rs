use std::io::Result;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=proto/license_protocol.proto");
    prost_build::compile_protos(&["proto/license_protocol.proto"], &["proto/"])?;
    Ok(())
}
