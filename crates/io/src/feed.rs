// Feed loading: disk to engine input

use std::io::Read;
use std::path::Path;

use planogrid_engine::decode::{decode_catalog, decode_inventory};
use planogrid_engine::model::{CatalogEntry, InventoryFeed};

/// Read file and convert to UTF-8 if needed (handles Windows-1252,
/// Latin-1, etc.), stripping a leading BOM.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    let decoded = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Load and decode a catalog feed file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, String> {
    let content = read_file_as_utf8(path)?;
    Ok(decode_catalog(&content))
}

/// Load and decode an inventory feed file.
pub fn load_inventory(path: &Path) -> Result<InventoryFeed, String> {
    let content = read_file_as_utf8(path)?;
    decode_inventory(&content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_utf8_with_bom() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all("\u{feff}hola,ñandú".as_bytes()).unwrap();
        let s = read_file_as_utf8(f.path()).unwrap();
        assert_eq!(s, "hola,ñandú");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        // "Género" encoded as Windows-1252: é = 0xE9
        f.write_all(b"G\xe9nero").unwrap();
        let s = read_file_as_utf8(f.path()).unwrap();
        assert_eq!(s, "Género");
    }

    #[test]
    fn load_inventory_roundtrip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "Grupo (Fórmula),Codigo Comercial,Tipo Prenda,Edad,Género,TITULO,COLOR,STOCK ECOMMERCE,STOCK LOCALES,Ranking Analytics,Ranking Locales,IMAGEN CARGADA\n%A000000001%,A0000000,REMERA,KIDS,UNISEX,Remera,AZUL,1,0,2,7,SI"
        )
        .unwrap();
        let feed = load_inventory(f.path()).unwrap();
        assert_eq!(feed.rows.len(), 1);
        assert_eq!(feed.rows[0].stripped_group_key(), "A000000001");
    }

    #[test]
    fn load_catalog_roundtrip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "<rss><channel><item><id>1</id><title>t</title><description>d</description>\
             <image_link>https://cdn.example.com/A000000001XX_1.jpg</image_link></item></channel></rss>"
        )
        .unwrap();
        let entries = load_catalog(f.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].group_key, "A000000001");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_inventory(Path::new("/nonexistent/feed.csv")).is_err());
    }
}
