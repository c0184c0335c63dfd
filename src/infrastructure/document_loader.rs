//! 文档读取器 - 基础设施层
//!
//! 只暴露"读出全文"的能力：给定文档句柄，按页序返回拼接后的完整文本。
//! 以只读方式打开文件，不持有任何共享可变状态，可在多个线程上并发调用。

use crate::error::LoadError;
use crate::models::DocumentHandle;
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::debug;

/// TJ 数组中超过该间距（千分之一字号，负值）视为词间空格
const WORD_GAP: f32 = -100.0;

/// 文档文本读取能力
pub trait DocumentLoader: Send + Sync {
    /// 读出文档全文，页边界折叠，阅读顺序保持不变
    fn load_text(&self, handle: &DocumentHandle) -> Result<String, LoadError>;
}

/// PDF 读取器（lopdf）
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextLoader;

impl DocumentLoader for PdfTextLoader {
    fn load_text(&self, handle: &DocumentHandle) -> Result<String, LoadError> {
        let path = handle.path();
        let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, e))?;

        let doc = Document::load_mem(&bytes).map_err(|e| LoadError::corrupt(path, e.to_string()))?;

        // get_pages 返回 BTreeMap，按页码升序遍历
        let mut text = String::new();
        for (page_num, page_id) in doc.get_pages() {
            let content = page_text(&doc, page_id)
                .map_err(|e| LoadError::corrupt(path, format!("第 {} 页: {}", page_num, e)))?;
            text.push_str(&content);
            if !content.ends_with('\n') {
                text.push('\n');
            }
        }

        debug!("PDF 读取完成: {} ({} 字符)", handle.display_name(), text.len());
        Ok(text)
    }
}

/// 按内容流顺序还原一页的文本行
///
/// 换行依据文本定位操作：`T*`、`'`、`"`、纵向位移非零的 `Td`/`TD`、
/// 改变纵坐标的 `Tm`，以及文本对象结束 `ET`。
fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(doc).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<BTreeMap<Vec<u8>, Encoding>>>()?;
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut page = PageText::default();
    let mut encoding = None;
    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "BT" => page.line_y = 0.0,
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Td" | "TD" => {
                let (dx, dy) = (operand_number(operands, 0), operand_number(operands, 1));
                if dy != 0.0 {
                    page.line_y += dy;
                    page.break_line();
                } else if dx != 0.0 {
                    page.space();
                }
            }
            "Tm" => {
                let y = operand_number(operands, 5);
                if y != page.line_y {
                    page.line_y = y;
                    page.break_line();
                }
            }
            "T*" | "ET" => page.break_line(),
            "Tj" | "TJ" => page.show(encoding, operands)?,
            "'" | "\"" => {
                page.break_line();
                page.show(encoding, operands)?;
            }
            _ => {}
        }
    }
    Ok(page.text)
}

fn operand_number(operands: &[Object], index: usize) -> f32 {
    operands
        .get(index)
        .and_then(|value| value.as_float().ok())
        .unwrap_or(0.0)
}

/// 单页文本累积器，保证不产生连续空行
#[derive(Default)]
struct PageText {
    text: String,
    line_y: f32,
}

impl PageText {
    fn break_line(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn space(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with(char::is_whitespace) {
            self.text.push(' ');
        }
    }

    /// 写出 Tj/TJ/'/" 的字符串操作数；顶层数字（如 `"` 的字距参数）忽略
    fn show(&mut self, encoding: Option<&Encoding>, operands: &[Object]) -> lopdf::Result<()> {
        let Some(encoding) = encoding else {
            debug!("文本操作前没有设置字体，跳过");
            return Ok(());
        };
        for operand in operands {
            match operand {
                Object::String(bytes, _) => self.text.push_str(&Document::decode_text(encoding, bytes)?),
                Object::Array(items) => {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                self.text.push_str(&Document::decode_text(encoding, bytes)?)
                            }
                            other if other.as_float().is_ok_and(|gap| gap < WORD_GAP) => self.space(),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// 纯文本读取器（UTF-8）
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load_text(&self, handle: &DocumentHandle) -> Result<String, LoadError> {
        let path = handle.path();
        let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| LoadError::corrupt(path, format!("不是合法的 UTF-8 文本: {}", e)))?;

        debug!("文本读取完成: {} ({} 字符)", handle.display_name(), text.len());
        Ok(text)
    }
}

/// 按扩展名分派的读取器
///
/// - `.pdf` → [`PdfTextLoader`]
/// - `.txt` / `.md` → [`PlainTextLoader`]
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDocumentLoader {
    pdf: PdfTextLoader,
    text: PlainTextLoader,
}

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否支持该文档格式
    pub fn supports(handle: &DocumentHandle) -> bool {
        matches!(handle.extension().as_deref(), Some("pdf" | "txt" | "md"))
    }
}

impl DocumentLoader for FileDocumentLoader {
    fn load_text(&self, handle: &DocumentHandle) -> Result<String, LoadError> {
        match handle.extension().as_deref() {
            Some("pdf") => self.pdf.load_text(handle),
            Some("txt" | "md") => self.text.load_text(handle),
            _ => Err(LoadError::UnsupportedFormat {
                path: handle.path().to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream};
    use std::io::Write;
    use std::path::Path;

    const PAGE_ONE: &[&str] = &[
        "Header",
        "1. What is 2+2?",
        "A. 3",
        "B. 4",
        "C. 5",
        "D. 6",
        "Answer: B",
    ];
    const PAGE_TWO: &[&str] = &[
        "2. Capital of France?",
        "A. Rome",
        "B. Paris",
        "C. Oslo",
        "D. Lima",
        "Answer: B",
    ];

    /// 每行一个 BT/ET 文本对象
    fn object_per_line(lines: &[&str]) -> Vec<Operation> {
        lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), (720 - 14 * i as i64).into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ]
            })
            .collect()
    }

    /// 整页一个文本对象，用 Td 下移换行
    fn single_object(lines: &[&str]) -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                ops.push(Operation::new("Td", vec![0.into(), (-14).into()]));
            }
            ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    }

    /// 整页一个文本对象，用 T* / ' / Tm 换行，TJ 数组带字距
    fn next_line_operators(lines: &[&str]) -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            match i % 3 {
                0 => {
                    if i > 0 {
                        let y = 720 - 14 * i as i64;
                        ops.push(Operation::new(
                            "Tm",
                            vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), y.into()],
                        ));
                    }
                    let (head, tail) = line.split_at(line.len() / 2);
                    ops.push(Operation::new(
                        "TJ",
                        vec![Object::Array(vec![
                            Object::string_literal(head),
                            (-20).into(),
                            Object::string_literal(tail),
                        ])],
                    ));
                }
                1 => ops.push(Operation::new("'", vec![Object::string_literal(*line)])),
                _ => {
                    ops.push(Operation::new("T*", vec![]));
                    ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                }
            }
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    }

    fn write_pdf(path: &Path, pages: &[Vec<Operation>]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|operations| {
                let content = Content {
                    operations: operations.clone(),
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => resources_id,
                }))
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn load_pdf(pages: &[Vec<Operation>]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.pdf");
        write_pdf(&path, pages);
        FileDocumentLoader::new()
            .load_text(&DocumentHandle::new(&path))
            .unwrap()
    }

    fn expected_text() -> String {
        let mut text = String::new();
        for line in PAGE_ONE.iter().chain(PAGE_TWO) {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_pdf_text_object_per_line() {
        let text = load_pdf(&[object_per_line(PAGE_ONE), object_per_line(PAGE_TWO)]);
        assert_eq!(text, expected_text());
    }

    #[test]
    fn test_pdf_single_text_object_keeps_line_breaks() {
        let text = load_pdf(&[single_object(PAGE_ONE), single_object(PAGE_TWO)]);
        assert_eq!(text, expected_text());
    }

    #[test]
    fn test_pdf_next_line_operators_and_text_matrix() {
        let text = load_pdf(&[
            next_line_operators(PAGE_ONE),
            next_line_operators(PAGE_TWO),
        ]);
        assert_eq!(text, expected_text());
    }

    #[test]
    fn test_pdf_pages_keep_reading_order() {
        let text = load_pdf(&[single_object(PAGE_TWO), single_object(PAGE_ONE)]);
        let capital = text.find("2. Capital of France?").unwrap();
        let arithmetic = text.find("1. What is 2+2?").unwrap();
        assert!(capital < arithmetic);
    }

    #[test]
    fn test_pdf_horizontal_move_and_wide_kerning_become_spaces() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal("1.")]),
            Operation::new("Td", vec![20.into(), 0.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Capital"),
                    (-250).into(),
                    Object::string_literal("city?"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ];
        assert_eq!(load_pdf(&[ops]), "1. Capital city?\n");
    }

    #[test]
    fn test_plain_text_roundtrip() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "1. Q?\nA. a\n").unwrap();

        let handle = DocumentHandle::new(file.path());
        let text = FileDocumentLoader::new().load_text(&handle).unwrap();
        assert_eq!(text, "1. Q?\nA. a\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let handle = DocumentHandle::new(dir.path().join("missing.pdf"));
        let err = FileDocumentLoader::new().load_text(&handle).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_garbage_pdf_is_corrupt() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();

        let handle = DocumentHandle::new(file.path());
        let err = PdfTextLoader.load_text(&handle).unwrap_err();
        assert!(matches!(err, LoadError::Corrupt { .. }));
    }

    #[test]
    fn test_invalid_utf8_text_is_corrupt() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let handle = DocumentHandle::new(file.path());
        let err = PlainTextLoader.load_text(&handle).unwrap_err();
        assert!(matches!(err, LoadError::Corrupt { .. }));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let handle = DocumentHandle::new("questions.docx");
        assert!(!FileDocumentLoader::supports(&handle));
        let err = FileDocumentLoader::new().load_text(&handle).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }
}
