// Column names, marker tokens and defaults of the request export format

/// Header names that must all appear in one row of the source sheet.
pub const COLUMN_STATE: &str = "Состояние заявки";
pub const COLUMN_STATUS: &str = "Статус заявки";
pub const COLUMN_AUTHOR: &str = "Автор заявки";
pub const COLUMN_CREATION_DATE: &str = "Дата создания заявки";
pub const COLUMN_PACKAGE_ID: &str = "ID пакета";

/// Matched as a substring of the state cell.
pub const STATE_DOUBLE_MARKER: &str = "Дубликат заявки";
pub const STATE_FOR_CREATION: &str = "ДОБАВЛЕНИЕ";
pub const STATE_FOR_EXPAND: &str = "РАСШИРЕНИЕ";

pub const STATUS_HANDLE_OVER: &str = "Обработка завершена";
pub const STATUS_RETURNED: &str = "Возвращена на уточнение";
pub const STATUS_SENT_FOR_HANDLE: &str = "Отправлена в обработку";

pub const DATA_SHEET_NAME: &str = "Data";
pub const HEADER_SCAN_ROWS: usize = 50;
pub const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

pub const META_COMMAND: &str = "meta";
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
