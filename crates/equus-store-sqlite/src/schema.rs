//! SQL schema for the Equus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are RFC 3339 text, calendar dates `YYYY-MM-DD` text, enums
/// their lowercase label. Date text sorts chronologically, which the expiry
/// queries rely on.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id                      INTEGER PRIMARY KEY,
    nombre                  TEXT NOT NULL,
    apellidos               TEXT NOT NULL,
    email                   TEXT NOT NULL UNIQUE,
    password_hash           TEXT NOT NULL,
    tipo_usuario            TEXT NOT NULL,   -- propietario | veterinario | transportista | autoridad
    num_colegiado           TEXT,
    num_licencia_transporte TEXT,
    id_autoridad            TEXT,
    fecha_registro          TEXT NOT NULL,
    ultimo_acceso           TEXT,
    activo                  INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS explotaciones (
    id               INTEGER PRIMARY KEY,
    codigo_rega      TEXT NOT NULL UNIQUE,
    nombre           TEXT NOT NULL,
    direccion        TEXT NOT NULL,
    municipio        TEXT NOT NULL,
    provincia        TEXT NOT NULL,
    codigo_postal    TEXT NOT NULL,
    telefono         TEXT NOT NULL,
    email            TEXT,
    tipo_explotacion TEXT NOT NULL,
    capacidad_maxima INTEGER NOT NULL,
    fecha_registro   TEXT NOT NULL,
    id_propietario   INTEGER REFERENCES users(id),
    activa           INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS caballos (
    id               INTEGER PRIMARY KEY,
    ueln             TEXT NOT NULL UNIQUE,
    microchip        TEXT NOT NULL UNIQUE,
    nombre           TEXT NOT NULL,
    fecha_nacimiento TEXT NOT NULL,
    sexo             TEXT NOT NULL,   -- macho | hembra | castrado
    raza             TEXT NOT NULL,
    capa             TEXT NOT NULL,
    pais_origen      TEXT NOT NULL,
    id_explotacion   INTEGER REFERENCES explotaciones(id),
    id_propietario   INTEGER REFERENCES users(id),
    fecha_registro   TEXT NOT NULL,
    activo           INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS pasaportes (
    id                INTEGER PRIMARY KEY,
    id_caballo        INTEGER NOT NULL REFERENCES caballos(id),
    numero_pasaporte  TEXT NOT NULL UNIQUE,
    fecha_emision     TEXT NOT NULL,
    autoridad_emisora TEXT NOT NULL,
    fecha_validez     TEXT,
    url_documento     TEXT,
    estado            TEXT NOT NULL,   -- vigente | caducado | suspendido | extraviado
    fecha_registro    TEXT NOT NULL,
    id_emisor         INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS guias_movimiento (
    id                  INTEGER PRIMARY KEY,
    id_caballo          INTEGER NOT NULL REFERENCES caballos(id),
    numero_guia         TEXT NOT NULL UNIQUE,
    fecha_emision       TEXT NOT NULL,
    explotacion_origen  INTEGER REFERENCES explotaciones(id),
    explotacion_destino INTEGER REFERENCES explotaciones(id),
    fecha_salida        TEXT NOT NULL,
    fecha_llegada       TEXT,
    motivo_traslado     TEXT NOT NULL,
    medio_transporte    TEXT NOT NULL,
    matricula_vehiculo  TEXT,
    id_transportista    INTEGER REFERENCES users(id),
    estado              TEXT NOT NULL,   -- emitida | en_transito | finalizada | cancelada
    url_documento       TEXT,
    fecha_registro      TEXT NOT NULL,
    id_emisor           INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS certificados_salud (
    id                 INTEGER PRIMARY KEY,
    id_caballo         INTEGER NOT NULL REFERENCES caballos(id),
    numero_certificado TEXT NOT NULL UNIQUE,
    fecha_emision      TEXT NOT NULL,
    fecha_validez      TEXT NOT NULL,
    id_veterinario     INTEGER REFERENCES users(id),
    resultado          TEXT NOT NULL,   -- apto | no_apto | apto_con_restricciones
    observaciones      TEXT,
    vacunas_aplicadas  TEXT,
    pruebas_realizadas TEXT,
    url_documento      TEXT,
    fecha_registro     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documentos_transporte_ue (
    id                       INTEGER PRIMARY KEY,
    id_caballo               INTEGER NOT NULL REFERENCES caballos(id),
    numero_documento         TEXT NOT NULL UNIQUE,
    fecha_emision            TEXT NOT NULL,
    pais_origen              TEXT NOT NULL,
    pais_destino             TEXT NOT NULL,
    punto_control_fronterizo TEXT,
    id_certificado_salud     INTEGER REFERENCES certificados_salud(id),
    id_guia_movimiento       INTEGER REFERENCES guias_movimiento(id),
    url_documento            TEXT,
    fecha_registro           TEXT NOT NULL,
    id_emisor                INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS libros_registro (
    id                         INTEGER PRIMARY KEY,
    id_explotacion             INTEGER NOT NULL REFERENCES explotaciones(id),
    fecha_apertura             TEXT NOT NULL,
    fecha_ultima_actualizacion TEXT NOT NULL,
    url_documento              TEXT,
    observaciones              TEXT,
    id_responsable             INTEGER REFERENCES users(id)
);

-- TME cards. The identity block (ueln .. capa) never changes after issue.
CREATE TABLE IF NOT EXISTS tarjetas_tme (
    id                                 INTEGER PRIMARY KEY,
    id_caballo                         INTEGER NOT NULL REFERENCES caballos(id),
    ueln                               TEXT NOT NULL UNIQUE,
    codigo_transpondedor               TEXT NOT NULL,
    nombre_equido                      TEXT NOT NULL,
    sexo                               TEXT NOT NULL,
    fecha_nacimiento                   TEXT NOT NULL,
    capa                               TEXT NOT NULL,
    fotografia_url                     TEXT,
    codigo_barras_ueln                 TEXT,
    numero_tarjeta                     TEXT NOT NULL UNIQUE,
    fecha_emision                      TEXT NOT NULL,
    autoridad_emisora                  TEXT NOT NULL,
    fecha_validez                      TEXT,
    tiene_escudo_espana                INTEGER NOT NULL DEFAULT 1,
    tiene_elementos_seguridad          INTEGER NOT NULL DEFAULT 1,
    leyenda_validez                    TEXT NOT NULL,
    numero_identificacion_electronico  TEXT,
    fotografia_reverso_url             TEXT,
    impresion_codificada_tme           TEXT,
    raza                               TEXT,
    pais_nacimiento                    TEXT,
    criador                            TEXT,
    propietario                        TEXT,
    observaciones                      TEXT,
    estado                             TEXT NOT NULL,   -- activa | suspendida | extraviada | anulada
    motivo_estado                      TEXT,
    fecha_registro                     TEXT NOT NULL,
    id_emisor                          INTEGER REFERENCES users(id),
    valida_movimientos_espana          INTEGER NOT NULL DEFAULT 1,
    valida_movimientos_ue              INTEGER NOT NULL DEFAULT 0,
    valida_movimientos_internacionales INTEGER NOT NULL DEFAULT 0
);

-- Card children are append-only.
CREATE TABLE IF NOT EXISTS resenas_tme (
    id                       INTEGER PRIMARY KEY,
    id_tarjeta               INTEGER NOT NULL REFERENCES tarjetas_tme(id),
    cabeza                   TEXT,
    cuello                   TEXT,
    tronco                   TEXT,
    extremidades_anteriores  TEXT,
    extremidades_posteriores TEXT,
    marcas_naturales         TEXT,
    marcas_artificiales      TEXT,
    cicatrices               TEXT,
    remolinos                TEXT,
    alzada_cruz              TEXT,
    perimetro_toracico       TEXT,
    perimetro_cana           TEXT,
    fecha_registro           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movimientos_tme (
    id                   INTEGER PRIMARY KEY,
    id_tarjeta           INTEGER NOT NULL REFERENCES tarjetas_tme(id),
    fecha_movimiento     TEXT NOT NULL,
    lugar_origen         TEXT NOT NULL,
    lugar_destino        TEXT NOT NULL,
    motivo_movimiento    TEXT NOT NULL,
    nombre_transportista TEXT,
    licencia_transporte  TEXT,
    vehiculo_matricula   TEXT,
    autorizado_por       TEXT,
    sello_oficial        INTEGER NOT NULL DEFAULT 0,
    fecha_registro       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS validaciones_veterinarias (
    id                           INTEGER PRIMARY KEY,
    id_tarjeta                   INTEGER NOT NULL REFERENCES tarjetas_tme(id),
    fecha_validacion             TEXT NOT NULL,
    tipo_validacion              TEXT NOT NULL,
    descripcion                  TEXT NOT NULL,
    nombre_veterinario           TEXT NOT NULL,
    numero_colegiado_veterinario TEXT NOT NULL,
    fecha_validez_hasta          TEXT,
    fecha_registro               TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS explotaciones_propietario_idx ON explotaciones(id_propietario);
CREATE INDEX IF NOT EXISTS caballos_propietario_idx      ON caballos(id_propietario);
CREATE INDEX IF NOT EXISTS caballos_explotacion_idx      ON caballos(id_explotacion);
CREATE INDEX IF NOT EXISTS pasaportes_caballo_idx        ON pasaportes(id_caballo);
CREATE INDEX IF NOT EXISTS pasaportes_validez_idx        ON pasaportes(fecha_validez);
CREATE INDEX IF NOT EXISTS guias_caballo_idx             ON guias_movimiento(id_caballo);
CREATE INDEX IF NOT EXISTS certificados_caballo_idx      ON certificados_salud(id_caballo);
CREATE INDEX IF NOT EXISTS certificados_validez_idx      ON certificados_salud(fecha_validez);
CREATE INDEX IF NOT EXISTS documentos_ue_caballo_idx     ON documentos_transporte_ue(id_caballo);
CREATE INDEX IF NOT EXISTS libros_explotacion_idx        ON libros_registro(id_explotacion);
CREATE INDEX IF NOT EXISTS tarjetas_caballo_idx          ON tarjetas_tme(id_caballo);
CREATE INDEX IF NOT EXISTS resenas_tarjeta_idx           ON resenas_tme(id_tarjeta);
CREATE INDEX IF NOT EXISTS movimientos_tarjeta_idx       ON movimientos_tme(id_tarjeta);
CREATE INDEX IF NOT EXISTS validaciones_tarjeta_idx      ON validaciones_veterinarias(id_tarjeta);

PRAGMA user_version = 1;
";
